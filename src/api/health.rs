/// Health check endpoints
///
/// The service always reports itself alive; the store status is reported
/// alongside so probes can tell a degraded database from a dead process.
use crate::{context::AppContext, db};
use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// REST health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
}

/// RPC health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub healthy: bool,
    pub version: String,
    pub database_status: String,
}

/// Build health routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/health", get(health))
}

async fn health(State(ctx): State<AppContext>) -> Json<HealthStatus> {
    let database = if database_reachable(&ctx).await {
        "connected"
    } else {
        "unavailable"
    };

    Json(HealthStatus {
        status: "healthy".to_string(),
        database: database.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: ctx.config.service.version.clone(),
    })
}

pub(crate) async fn check(ctx: &AppContext) -> HealthCheckResponse {
    let database_status = if database_reachable(ctx).await {
        "healthy"
    } else {
        "unhealthy"
    };

    HealthCheckResponse {
        healthy: true,
        version: ctx.config.service.version.clone(),
        database_status: database_status.to_string(),
    }
}

async fn database_reachable(ctx: &AppContext) -> bool {
    match db::test_connection(&ctx.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    }
}

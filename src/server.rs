/// HTTP server setup and routing
///
/// Two listeners share one `AppContext`: the REST API and the
/// method-per-operation RPC API, each on its own port.
use crate::{
    api::{
        self,
        middleware::{enforce_deadline, REQUEST_TIMEOUT_HEADER},
    },
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware,
    response::Json,
    Router,
};
use serde_json::json;
use std::future::IntoFuture;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the REST router
/// Returns Router<()> because state is already provided
pub fn build_rest_router(ctx: AppContext) -> Router {
    with_common_layers(api::routes(), ctx)
}

/// Build the RPC router
pub fn build_rpc_router(ctx: AppContext) -> Router {
    with_common_layers(api::rpc::routes(), ctx)
}

fn with_common_layers(routes: Router<AppContext>, ctx: AppContext) -> Router {
    let limits = ctx.config.request.clone();

    routes
        .fallback(not_found)
        .with_state(ctx)
        .layer(middleware::from_fn_with_state(limits, enforce_deadline))
        .layer(cors_layer())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_TIMEOUT_HEADER),
        ])
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start both servers and run until ctrl-c
pub async fn serve(ctx: AppContext) -> ApiResult<()> {
    let rest_addr = format!("{}:{}", ctx.config.service.host, ctx.config.service.http_port);
    let rpc_addr = format!("{}:{}", ctx.config.service.host, ctx.config.service.rpc_port);

    let rest_listener = bind(&rest_addr).await?;
    let rpc_listener = bind(&rpc_addr).await?;

    info!("REST API listening on {}", rest_addr);
    info!("RPC API listening on {}", rpc_addr);

    let rest = axum::serve(rest_listener, build_rest_router(ctx.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let rpc = axum::serve(rpc_listener, build_rpc_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::try_join!(rest, rpc)
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    info!("Servers stopped");
    Ok(())
}

async fn bind(addr: &str) -> ApiResult<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind to {}: {}", addr, e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

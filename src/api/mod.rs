/// API routes and handlers
pub mod account;
pub mod building;
pub mod contact;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod rpc;
pub mod user;

use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::Router;

/// Build REST routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(account::routes())
        .merge(user::routes())
        .merge(building::routes())
        .merge(contact::routes())
}

/// Parse a numeric record id received as text
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::Validation(format!("Invalid {} ID", what)))
}

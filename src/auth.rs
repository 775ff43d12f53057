/// Authentication extractor for bearer-protected handlers
use crate::{api::middleware::extract_bearer_token, context::AppContext, error::ApiError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Authenticated caller - extracted from a valid access token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

        let claims = state.account_manager.validate_access_token(&token)?;

        Ok(AuthContext {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

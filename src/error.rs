/// Unified error types for the Domunity backend
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Message returned for any failed login, whichever factor was wrong
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Main error type for the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Unknown email or wrong password. Carries no detail on purpose.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer/refresh token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request ran past its deadline
    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token signing failures
    #[error("Token error: {0}")]
    Token(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Message that is safe to hand to a client.
    ///
    /// Authentication and storage failures collapse to fixed strings; the
    /// detail stays in server-side logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            ApiError::Authentication(_) => "Authentication required".to_string(),
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                msg.clone()
            }
            ApiError::DeadlineExceeded(_) => "Request deadline exceeded".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidCredentials | ApiError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, "AuthenticationRequired")
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "InvalidRequest"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            ApiError::DeadlineExceeded(_) => (StatusCode::GATEWAY_TIMEOUT, "DeadlineExceeded"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError"),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect::<Vec<_>>();
        ApiError::Validation(format!("Invalid field(s): {}", fields.join(", ")))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        match &self {
            ApiError::InvalidCredentials | ApiError::Authentication(_) => {
                tracing::debug!(error = %self, "Request rejected as unauthenticated");
            }
            ApiError::Validation(_) | ApiError::NotFound(_) | ApiError::Conflict(_) => {}
            ApiError::DeadlineExceeded(_) => tracing::warn!(error = %self, "Request timed out"),
            _ => tracing::error!(error = %self, "Request failed"),
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message: self.public_message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_detail_is_not_exposed() {
        let err = ApiError::Authentication("Token has expired".to_string());
        assert_eq!(err.public_message(), "Authentication required");
        assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("User not found".into()).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DeadlineExceeded(Duration::from_millis(5))
                .status_and_code()
                .0,
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::InvalidCredentials.public_message(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }
}

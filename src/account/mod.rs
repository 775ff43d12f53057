/// Account management system
///
/// Handles credential storage, password hashing, token issuance and the
/// login / registration / refresh flows built on top of them.

mod manager;
mod password;
mod store;
mod token;

pub use manager::{AccountManager, FORGOT_PASSWORD_MESSAGE};
pub use password::PasswordHasher;
pub use store::{NewUser, UserStore};
pub use token::{AccessClaims, RefreshClaims, TokenError, TokenIssuer, TokenKind};

use crate::db::models::PublicUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens and user returned by a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

impl LoginResponse {
    pub fn success(session: LoginSession) -> Self {
        Self {
            success: true,
            message: "Login successful".to_string(),
            access_token: Some(session.access_token),
            refresh_token: Some(session.refresh_token),
            user: Some(session.user),
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            access_token: None,
            refresh_token: None,
            user: None,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Forgot-password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Forgot-password response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
}

/// Treat empty optional text as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

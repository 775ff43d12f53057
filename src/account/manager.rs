/// Auth orchestrator: login, registration, token refresh
///
/// Stateless between requests. Tokens are self-contained; nothing about a
/// login is written to the store.
use super::{
    non_empty, AccessClaims, LoginSession, NewUser, PasswordHasher, RegisterRequest, TokenIssuer,
    UserStore,
};
use crate::error::{ApiError, ApiResult};
use sqlx::SqlitePool;
use validator::Validate;

/// Reply to every forgot-password request, known email or not
pub const FORGOT_PASSWORD_MESSAGE: &str = "Password reset instructions sent to your email";

/// Account manager service
pub struct AccountManager {
    users: UserStore,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(db: SqlitePool, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users: UserStore::new(db),
            hasher,
            tokens,
        }
    }

    /// Authenticate by email and password and issue access + refresh tokens.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginSession> {
        tracing::info!(email, "Login request");

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!(email, "Login rejected: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Login rejected: password mismatch");
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = self.tokens.issue_access_token(user.id, &user.email)?;
        let refresh_token = self.tokens.issue_refresh_token(user.id)?;

        tracing::info!(user_id = user.id, "Login successful");

        Ok(LoginSession {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Create a new user. No token is issued; the caller logs in separately.
    pub async fn register(&self, req: RegisterRequest) -> ApiResult<i64> {
        tracing::info!(email = %req.email, "Register request");
        req.validate()?;

        let password_hash = self.hash_password(req.password).await?;

        let user_id = self
            .users
            .insert(&NewUser {
                email: req.email,
                password_hash,
                full_name: non_empty(req.full_name),
                phone: non_empty(req.phone),
            })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Registration failed");
                e
            })?;

        tracing::info!(user_id, "User registered");
        Ok(user_id)
    }

    /// Mint a new access token from a valid refresh token.
    ///
    /// The refresh token stays valid; nothing is rotated or revoked.
    pub async fn refresh_token(&self, refresh_token: &str) -> ApiResult<String> {
        let claims = self.tokens.verify_refresh_token(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            ApiError::from(e)
        })?;

        let user = self.users.find_by_id(claims.user_id).await?.ok_or_else(|| {
            ApiError::Authentication(format!("user {} no longer exists", claims.user_id))
        })?;

        self.tokens.issue_access_token(user.id, &user.email)
    }

    /// Acknowledge a password reset request without side effects
    pub fn forgot_password(&self, email: &str) -> &'static str {
        tracing::info!(email, "Forgot-password request");
        FORGOT_PASSWORD_MESSAGE
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> ApiResult<AccessClaims> {
        Ok(self.tokens.verify_access_token(token)?)
    }

    async fn hash_password(&self, password: String) -> ApiResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, digest: &str) -> ApiResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))
    }
}

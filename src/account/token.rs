/// Signed bearer tokens (HS256 JWT) for access and refresh
///
/// Claims are decoded into typed structures that reject unknown or missing
/// fields. Each token carries a `kind` claim so an access token can never be
/// replayed where a refresh token is expected, and the other way around.
use crate::{
    config::AuthConfig,
    error::{ApiError, ApiResult},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Which of the two token classes a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessClaims {
    pub user_id: i64,
    pub email: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of a long-lived refresh token (no email)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshClaims {
    pub user_id: i64,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

trait KindedClaims {
    fn kind(&self) -> TokenKind;
    fn expires_at(&self) -> i64;
}

impl KindedClaims for AccessClaims {
    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl KindedClaims for RefreshClaims {
    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Why a token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("expected a {expected:?} token")]
    WrongKind { expected: TokenKind },
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Authentication(err.to_string())
    }
}

/// Issues and verifies tokens with the process-wide signing secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the authentication configuration
    pub fn new(config: &AuthConfig) -> ApiResult<Self> {
        let access_ttl = Duration::try_hours(config.access_token_ttl_hours).ok_or_else(|| {
            ApiError::Config("JWT_ACCESS_TTL_HOURS is out of range".to_string())
        })?;
        let refresh_ttl = Duration::try_days(config.refresh_token_ttl_days).ok_or_else(|| {
            ApiError::Config("JWT_REFRESH_TTL_DAYS is out of range".to_string())
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issue an access token valid from now
    pub fn issue_access_token(&self, user_id: i64, email: &str) -> ApiResult<String> {
        self.issue_access_token_at(user_id, email, Utc::now())
    }

    /// Issue an access token as if the current instant were `now`
    pub fn issue_access_token_at(
        &self,
        user_id: i64,
        email: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<String> {
        let claims = AccessClaims {
            user_id,
            email: email.to_string(),
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: expiry(now, self.access_ttl)?,
        };
        self.sign(&claims)
    }

    /// Issue a refresh token valid from now
    pub fn issue_refresh_token(&self, user_id: i64) -> ApiResult<String> {
        self.issue_refresh_token_at(user_id, Utc::now())
    }

    /// Issue a refresh token as if the current instant were `now`
    pub fn issue_refresh_token_at(&self, user_id: i64, now: DateTime<Utc>) -> ApiResult<String> {
        let claims = RefreshClaims {
            user_id,
            kind: TokenKind::Refresh,
            iat: now.timestamp(),
            exp: expiry(now, self.refresh_ttl)?,
        };
        self.sign(&claims)
    }

    /// Verify an access token against the current time
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify_access_token_at(token, Utc::now())
    }

    /// Verify an access token against an explicit instant
    pub fn verify_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        self.verify_kind(token, TokenKind::Access, now)
    }

    /// Verify a refresh token against the current time
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verify_refresh_token_at(token, Utc::now())
    }

    /// Verify a refresh token against an explicit instant
    pub fn verify_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        self.verify_kind(token, TokenKind::Refresh, now)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> ApiResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::Token(format!("Failed to sign token: {}", e)))
    }

    fn verify_kind<C>(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<C, TokenError>
    where
        C: DeserializeOwned + KindedClaims,
    {
        // Expiry is checked below against the caller's clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<C>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?
            .claims;

        if claims.kind() != expected {
            return Err(TokenError::WrongKind { expected });
        }

        if now.timestamp() >= claims.expires_at() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> ApiResult<i64> {
    now.checked_add_signed(ttl)
        .map(|at| at.timestamp())
        .ok_or_else(|| ApiError::Token("Token expiry is out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            access_token_ttl_hours: 24,
            refresh_token_ttl_days: 30,
        })
        .unwrap()
    }

    const SECRET: &str = "test-secret-key-for-testing-only-0123456789";

    #[test]
    fn test_access_token_round_trip() {
        let tokens = issuer(SECRET);
        let now = Utc::now();
        let token = tokens.issue_access_token_at(42, "alice@example.com", now).unwrap();

        let claims = tokens.verify_access_token_at(&token, now).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_access_token_expires() {
        let tokens = issuer(SECRET);
        let issued = Utc::now();
        let token = tokens.issue_access_token_at(1, "a@example.com", issued).unwrap();

        assert!(tokens
            .verify_access_token_at(&token, issued + Duration::hours(23))
            .is_ok());
        assert_eq!(
            tokens.verify_access_token_at(&token, issued + Duration::hours(24)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            tokens.verify_access_token_at(&token, issued + Duration::days(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_refresh_token_lifetime_and_claims() {
        let tokens = issuer(SECRET);
        let issued = Utc::now();
        let token = tokens.issue_refresh_token_at(9, issued).unwrap();

        let claims = tokens
            .verify_refresh_token_at(&token, issued + Duration::days(29))
            .unwrap();
        assert_eq!(claims.user_id, 9);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);

        assert_eq!(
            tokens.verify_refresh_token_at(&token, issued + Duration::days(30)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let ours = issuer(SECRET);
        let theirs = issuer("another-secret-entirely-0123456789abcdef");
        let token = theirs.issue_refresh_token(5).unwrap();

        assert_eq!(
            ours.verify_refresh_token(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let tokens = issuer(SECRET);
        let access = tokens.issue_access_token(3, "c@example.com").unwrap();
        let refresh = tokens.issue_refresh_token(3).unwrap();

        assert!(tokens.verify_refresh_token(&access).is_err());
        assert!(tokens.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = issuer(SECRET);

        assert!(matches!(
            tokens.verify_access_token("not.a.jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            tokens.verify_access_token(""),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let tokens = issuer(SECRET);
        let token = tokens.issue_access_token(3, "c@example.com").unwrap();
        let other = tokens.issue_access_token(4, "d@example.com").unwrap();

        // Splice the payload of one token onto the signature of another
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            tokens.verify_access_token(&forged),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_unknown_claims_are_rejected() {
        #[derive(Serialize)]
        struct Extended {
            user_id: i64,
            email: String,
            kind: TokenKind,
            iat: i64,
            exp: i64,
            role: String,
        }

        let tokens = issuer(SECRET);
        let now = Utc::now().timestamp();
        let token = tokens
            .sign(&Extended {
                user_id: 1,
                email: "a@example.com".to_string(),
                kind: TokenKind::Access,
                iat: now,
                exp: now + 3600,
                role: "admin".to_string(),
            })
            .unwrap();

        assert!(matches!(
            tokens.verify_access_token(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_kind_claim_is_checked() {
        #[derive(Serialize)]
        struct Mislabelled {
            user_id: i64,
            kind: TokenKind,
            iat: i64,
            exp: i64,
        }

        let tokens = issuer(SECRET);
        let now = Utc::now().timestamp();
        let token = tokens
            .sign(&Mislabelled {
                user_id: 1,
                kind: TokenKind::Access,
                iat: now,
                exp: now + 3600,
            })
            .unwrap();

        assert_eq!(
            tokens.verify_refresh_token(&token),
            Err(TokenError::WrongKind {
                expected: TokenKind::Refresh
            })
        );
    }

    #[test]
    fn test_unrepresentable_lifetime_is_a_config_error() {
        let result = TokenIssuer::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            access_token_ttl_hours: 24,
            refresh_token_ttl_days: 9_000_000_000_000,
        });
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_expiry_past_calendar_end_is_an_error() {
        let tokens = TokenIssuer::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            access_token_ttl_hours: 2_400_000_000,
            refresh_token_ttl_days: 30,
        })
        .unwrap();

        let err = tokens.issue_access_token(1, "a@example.com").unwrap_err();
        assert!(matches!(err, ApiError::Token(_)));
    }
}

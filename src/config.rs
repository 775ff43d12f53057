/// Configuration management for the Domunity backend
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub request: RequestConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    /// Port of the REST surface
    pub http_port: u16,
    /// Port of the RPC surface
    pub rpc_port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_days: i64,
}

/// Per-request deadline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Deadline applied when the caller does not supply one
    pub default_timeout_ms: u64,
    /// Upper bound for caller-supplied deadlines
    pub max_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

const DEFAULT_DATABASE_URL: &str = "sqlite://./data/domunity.sqlite?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "domunity=debug,tower_http=debug";
const MIN_SECRET_LEN: usize = 32;
const MAX_ACCESS_TTL_HOURS: i64 = 8_760;
const MAX_REFRESH_TTL_DAYS: i64 = 3_650;

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let http_port = parse_var(&lookup, "HTTP_PORT", 8080u16)?;
        let rpc_port = match lookup("GRPC_PORT") {
            Some(_) => parse_var(&lookup, "GRPC_PORT", 50051u16)?,
            None => parse_var(&lookup, "PORT", 50051u16)?,
        };
        let version =
            lookup("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
        let acquire_timeout_secs = parse_var(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5u64)?;

        // No built-in fallback secret: an unset secret is a startup error
        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| ApiError::Config("JWT_SECRET must be set".to_string()))?;
        let access_token_ttl_hours = parse_var(&lookup, "JWT_ACCESS_TTL_HOURS", 24i64)?;
        let refresh_token_ttl_days = parse_var(&lookup, "JWT_REFRESH_TTL_DAYS", 30i64)?;

        let default_timeout_ms = parse_var(&lookup, "REQUEST_TIMEOUT_MS", 10_000u64)?;
        let max_timeout_ms = parse_var(&lookup, "REQUEST_TIMEOUT_MAX_MS", 60_000u64)?;

        let level = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let format = parse_var(&lookup, "LOG_FORMAT", LogFormat::Pretty)?;

        Ok(ServerConfig {
            service: ServiceConfig {
                host,
                http_port,
                rpc_port,
                version,
            },
            storage: StorageConfig {
                database_url,
                max_connections,
                acquire_timeout_secs,
            },
            authentication: AuthConfig {
                jwt_secret,
                access_token_ttl_hours,
                refresh_token_ttl_days,
            },
            request: RequestConfig {
                default_timeout_ms,
                max_timeout_ms,
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.host.is_empty() {
            return Err(ApiError::Config("HOST cannot be empty".to_string()));
        }

        if self.service.http_port == self.service.rpc_port {
            return Err(ApiError::Config(
                "HTTP and RPC surfaces need distinct ports".to_string(),
            ));
        }

        if self.authentication.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ApiError::Config(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }

        if self.authentication.access_token_ttl_hours <= 0
            || self.authentication.refresh_token_ttl_days <= 0
        {
            return Err(ApiError::Config("Token lifetimes must be positive".to_string()));
        }

        if self.authentication.access_token_ttl_hours > MAX_ACCESS_TTL_HOURS {
            return Err(ApiError::Config(format!(
                "JWT_ACCESS_TTL_HOURS must not exceed {}",
                MAX_ACCESS_TTL_HOURS
            )));
        }

        if self.authentication.refresh_token_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(ApiError::Config(format!(
                "JWT_REFRESH_TTL_DAYS must not exceed {}",
                MAX_REFRESH_TTL_DAYS
            )));
        }

        if self.storage.max_connections == 0 {
            return Err(ApiError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        if self.request.default_timeout_ms == 0
            || self.request.default_timeout_ms > self.request.max_timeout_ms
        {
            return Err(ApiError::Config(
                "REQUEST_TIMEOUT_MS must be positive and not exceed REQUEST_TIMEOUT_MAX_MS"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> ApiResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret-key-for-testing-only-0123456789".to_string()),
        "REQUEST_TIMEOUT_MS" => Some("30000".to_string()),
        _ => None,
    })
    .expect("test configuration")
}

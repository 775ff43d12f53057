/// Application context and dependency injection
use crate::{
    account::{AccountManager, PasswordHasher, TokenIssuer},
    building::BuildingDirectory,
    config::ServerConfig,
    contact::ContactIntake,
    db,
    error::ApiResult,
    profile::ProfileAggregator,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub account_manager: Arc<AccountManager>,
    pub profiles: Arc<ProfileAggregator>,
    pub buildings: Arc<BuildingDirectory>,
    pub contacts: Arc<ContactIntake>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        let pool = db::create_pool(&config.storage).await?;

        tracing::info!("Running database migrations");
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        Self::from_pool(config, pool)
    }

    /// Wire the services over an existing, already migrated pool
    pub fn from_pool(config: ServerConfig, pool: SqlitePool) -> ApiResult<Self> {
        let account_manager = Arc::new(AccountManager::new(
            pool.clone(),
            PasswordHasher::new()?,
            TokenIssuer::new(&config.authentication)?,
        ));

        Ok(Self {
            config: Arc::new(config),
            account_manager,
            profiles: Arc::new(ProfileAggregator::new(pool.clone())),
            buildings: Arc::new(BuildingDirectory::new(pool.clone())),
            contacts: Arc::new(ContactIntake::new(pool.clone())),
            db: pool,
        })
    }
}

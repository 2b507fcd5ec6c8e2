//! # Infrastructure Layer
//!
//! Concrete implementations behind the token keeper core: the Redis
//! connection and the token store adapter built on it.
//!
//! ## Features
//!
//! - `redis-cache`: Enable Redis-backed storage (default)

use std::sync::Arc;

use tk_core::errors::StoreError;
use tk_core::services::TokenManager;
use tk_shared::config::AppConfig;

/// Cache module - Redis client and token store
pub mod cache;

use cache::RedisTokenStore;

/// Token manager wired to the Redis store
pub type RedisTokenManager = TokenManager<RedisTokenStore>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Store shared with the token manager
    pub token_store: Arc<RedisTokenStore>,
    /// Token lifecycle manager
    pub token_manager: Arc<RedisTokenManager>,
}

/// Initialize infrastructure services from configuration
///
/// This function:
/// - Connects to Redis
/// - Builds the token store and manager
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        address = %config.store.address(),
        database = config.store.database,
        "Initializing infrastructure services..."
    );

    let token_store = Arc::new(RedisTokenStore::connect(&config.store).await?);
    let token_manager = Arc::new(TokenManager::from_config(token_store.clone(), &config.token));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        token_store,
        token_manager,
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection attempt did not complete in time
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Cache(e) => cache::token_store::store_error(&e),
            InfrastructureError::Config(message) => StoreError::Command { message },
            InfrastructureError::Timeout(message) => StoreError::Timeout { message },
        }
    }
}

//! Redis-backed token store
//!
//! Every token lives under a single key `{prefix}:{id}` holding the token
//! value, with the Redis expiry set to the token's absolute expiry.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use redis::RedisError;
use tracing::{debug, info};

use tk_core::errors::StoreError;
use tk_core::repositories::{RemainingTtl, TokenStore};
use tk_shared::config::StoreConfig;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Token store adapter over a Redis connection
#[derive(Clone)]
pub struct RedisTokenStore {
    /// Redis client for store operations
    redis_client: RedisClient,
    /// Key namespace and skew settings
    config: StoreConfig,
    /// Correction subtracted from TTL readings
    ttl_skew: Duration,
}

impl RedisTokenStore {
    /// Dial Redis and build a store from configuration
    pub async fn connect(config: &StoreConfig) -> Result<Self, InfrastructureError> {
        let redis_client = RedisClient::new(config).await?;
        Ok(Self::new(redis_client, config))
    }

    /// Build a store over an existing client
    ///
    /// Only the key prefix and TTL skew are taken from `config`.
    pub fn new(redis_client: RedisClient, config: &StoreConfig) -> Self {
        Self {
            redis_client,
            ttl_skew: ttl_skew_from_config(config),
            config: config.clone(),
        }
    }

    /// Namespaced key for a token id
    pub fn key(&self, id: &str) -> String {
        self.config.make_key(id)
    }

    /// Check that the store answers
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        self.redis_client.health_check().await
    }

    /// Release the connection held by this store.
    ///
    /// Clones of the store share the connection; it closes once the last one
    /// is gone.
    pub fn close(self) {
        info!(prefix = %self.config.key_prefix, "Closing token store connection");
        drop(self);
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn set(&self, id: &str, value: &str, expire_at: DateTime<Utc>) -> Result<(), StoreError> {
        let key = self.key(id);
        self.redis_client
            .set_with_expire_at(&key, value, expire_at.timestamp())
            .await
            .map_err(|e| store_error(&e))
    }

    async fn get(&self, id: &str) -> Result<Option<String>, StoreError> {
        self.redis_client
            .get(&self.key(id))
            .await
            .map_err(|e| store_error(&e))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let deleted = self
            .redis_client
            .delete(&self.key(id))
            .await
            .map_err(|e| store_error(&e))?;

        if !deleted {
            debug!(id = id, "No token to delete");
        }
        Ok(())
    }

    async fn remaining_ttl(&self, id: &str) -> Result<RemainingTtl, StoreError> {
        let reply = self
            .redis_client
            .ttl(&self.key(id))
            .await
            .map_err(|e| store_error(&e))?;

        Ok(remaining_ttl_from_reply(reply))
    }

    fn ttl_skew(&self) -> Duration {
        self.ttl_skew
    }
}

/// Skew correction configured for TTL readings, saturating on huge values
pub(crate) fn ttl_skew_from_config(config: &StoreConfig) -> Duration {
    i64::try_from(config.ttl_skew_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// Interpret a Redis TTL reply
pub(crate) fn remaining_ttl_from_reply(reply: i64) -> RemainingTtl {
    match reply {
        -1 => RemainingTtl::NoExpiry,
        seconds if seconds >= 0 => RemainingTtl::Seconds(seconds as u64),
        _ => RemainingTtl::Missing,
    }
}

/// Classify a Redis failure for the token domain
pub(crate) fn store_error(error: &RedisError) -> StoreError {
    let message = error.to_string();
    if error.is_timeout() {
        StoreError::Timeout { message }
    } else if error.is_io_error() || error.is_connection_refusal() || error.is_connection_dropped() {
        StoreError::Connection { message }
    } else {
        StoreError::Command { message }
    }
}

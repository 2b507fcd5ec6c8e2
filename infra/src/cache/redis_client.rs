//! Redis client implementation
//!
//! This module owns the connection to the Redis server backing the token
//! store. Dialing retries with exponential backoff; individual commands are
//! issued once and their failures are returned to the caller unchanged.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use tk_shared::config::StoreConfig;

use crate::InfrastructureError;

/// Redis client holding one multiplexed connection
///
/// Cloning is cheap and shares the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect using the given store configuration
    ///
    /// # Arguments
    /// * `config` - Store configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    ///
    /// # Example
    /// ```no_run
    /// use tk_infra::cache::RedisClient;
    /// use tk_shared::config::StoreConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = StoreConfig::new("localhost", 6379).with_database(1);
    ///     let client = RedisClient::new(&config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: &StoreConfig) -> Result<Self, InfrastructureError> {
        Self::connect(
            &config.url(),
            config.connect_retries,
            config.retry_delay_ms,
            Duration::from_secs(config.connection_timeout_secs),
        )
        .await
    }

    /// Connect to an explicit Redis URL
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `max_retries` - Maximum number of dial attempts
    /// * `retry_delay_ms` - Base delay between attempts in milliseconds
    /// * `connect_timeout` - Limit for each dial attempt
    pub async fn connect(
        url: &str,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(url));

        let client = Client::open(url).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            max_retries.max(1),
            retry_delay_ms,
            connect_timeout,
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self { connection })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(Ok(connection)) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Ok(Err(e)) => InfrastructureError::Cache(e),
                Err(_) => InfrastructureError::Timeout(format!(
                    "no connection within {}ms",
                    connect_timeout.as_millis()
                )),
            };

            if attempts >= max_retries {
                error!(
                    "Failed to connect to Redis after {} attempts: {}",
                    attempts, outcome
                );
                return Err(outcome);
            }

            warn!(
                "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                attempts, max_retries, outcome, delay
            );
            sleep(Duration::from_millis(delay)).await;
            // Exponential backoff with cap at 5 seconds
            delay = (delay * 2).min(5000);
        }
    }

    /// Set a value and its absolute expiry in one MULTI/EXEC transaction
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to store
    /// * `expire_at_unix` - Expiry as Unix timestamp in seconds
    pub async fn set_with_expire_at(
        &self,
        key: &str,
        value: &str,
        expire_at_unix: i64,
    ) -> Result<(), RedisError> {
        debug!("Setting key '{}' expiring at {}", key, expire_at_unix);

        let mut conn = self.connection.clone();
        let result = redis::pipe()
            .atomic()
            .set(key, value)
            .ignore()
            .cmd("EXPIREAT")
            .arg(key)
            .arg(expire_at_unix)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await;

        if let Err(e) = &result {
            error!("Failed to set key '{}': {}", key, e);
        }
        result
    }

    /// Get a value, `None` if the key does not exist
    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        debug!("Getting key '{}'", key);

        let mut conn = self.connection.clone();
        let result = conn.get::<_, Option<String>>(key).await;

        match &result {
            Ok(Some(_)) => debug!("Successfully retrieved key '{}'", key),
            Ok(None) => debug!("Key '{}' not found", key),
            Err(e) => error!("Failed to get key '{}': {}", key, e),
        }
        result
    }

    /// Delete a key
    ///
    /// # Returns
    /// * `Result<bool, RedisError>` - True if key was deleted, false if not found
    pub async fn delete(&self, key: &str) -> Result<bool, RedisError> {
        debug!("Deleting key '{}'", key);

        let mut conn = self.connection.clone();
        match conn.del::<_, u32>(key).await {
            Ok(deleted_count) => {
                debug!("Deleted {} key(s) for '{}'", deleted_count, key);
                Ok(deleted_count > 0)
            }
            Err(e) => {
                error!("Failed to delete key '{}': {}", key, e);
                Err(e)
            }
        }
    }

    /// Raw TTL reply for a key: -2 if missing, -1 if no expiry, else seconds
    pub async fn ttl(&self, key: &str) -> Result<i64, RedisError> {
        debug!("Getting TTL for key '{}'", key);

        let mut conn = self.connection.clone();
        let result = conn.ttl::<_, i64>(key).await;

        match &result {
            Ok(ttl) => debug!("Key '{}' TTL reply: {}", key, ttl),
            Err(e) => error!("Failed to get TTL for key '{}': {}", key, e),
        }
        result
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let mut conn = self.connection.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}

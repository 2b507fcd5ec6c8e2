//! Key-value store configuration module

use serde::{Deserialize, Serialize};

use super::parse_or;

/// Key prefix used when none is configured
pub const DEFAULT_KEY_PREFIX: &str = "token";

/// Observed skew of the store's TTL reading, in seconds
pub const DEFAULT_TTL_SKEW_SECONDS: u64 = 4;

/// Redis store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis host name
    pub host: String,

    /// Redis port
    pub port: u16,

    /// Redis database number (0-15)
    pub database: u8,

    /// Optional password for AUTH
    pub password: Option<String>,

    /// Prefix for every token key
    pub key_prefix: String,

    /// Seconds subtracted from the store's TTL reading
    pub ttl_skew_seconds: u64,

    /// Connection dial attempts before giving up
    pub connect_retries: u32,

    /// Base delay between dial attempts in milliseconds
    pub retry_delay_ms: u64,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 6379,
            database: 0,
            password: None,
            key_prefix: String::from(DEFAULT_KEY_PREFIX),
            ttl_skew_seconds: DEFAULT_TTL_SKEW_SECONDS,
            connect_retries: 3,
            retry_delay_ms: 100,
            connection_timeout_secs: 5,
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup, falling back to defaults
    /// for missing, empty or unparseable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("REDIS_HOST").unwrap_or(defaults.host),
            port: parse_or(non_empty("REDIS_PORT"), defaults.port),
            database: parse_or(non_empty("REDIS_DB"), defaults.database).min(15),
            password: non_empty("REDIS_PASSWORD"),
            key_prefix: non_empty("TOKEN_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            ttl_skew_seconds: parse_or(non_empty("TOKEN_TTL_SKEW_SECONDS"), defaults.ttl_skew_seconds),
            connect_retries: parse_or(non_empty("REDIS_CONNECT_RETRIES"), defaults.connect_retries),
            retry_delay_ms: defaults.retry_delay_ms,
            connection_timeout_secs: defaults.connection_timeout_secs,
        }
    }

    /// Create a configuration pointing at the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the key prefix for all token keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the database number
    pub fn with_database(mut self, db: u8) -> Self {
        self.database = db.min(15);
        self
    }

    /// Set the TTL skew correction
    pub fn with_ttl_skew(mut self, seconds: u64) -> Self {
        self.ttl_skew_seconds = seconds;
        self
    }

    /// `host:port` of the store
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection URL understood by the redis client
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}/{}",
                password,
                self.address(),
                self.database
            ),
            None => format!("redis://{}/{}", self.address(), self.database),
        }
    }

    /// Namespaced key for a token id
    pub fn make_key(&self, id: &str) -> String {
        format!("{}:{}", self.key_prefix, id)
    }
}

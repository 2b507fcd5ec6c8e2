//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `store` - Redis connection and key namespacing
//! - `token` - Token lifetime

pub mod environment;
pub mod store;
pub mod token;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use store::StoreConfig;
pub use token::TokenConfig;

/// Complete configuration for an embedded token keeper
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Store connection configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Token issuance configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// The environment-specific file (`.env.development`, ...) is read first,
    /// then `.env`. Neither overrides variables already set in the process.
    pub fn from_env() -> Self {
        dotenvy::from_filename(Environment::from_env().env_file()).ok();
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);
        Self {
            environment,
            store: StoreConfig::from_lookup(&lookup),
            token: TokenConfig::from_lookup(&lookup),
            logging: LoggingConfig::from_lookup(environment, &lookup),
        }
    }
}

/// Parse an optional raw value, keeping `default` when absent or malformed
pub(crate) fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

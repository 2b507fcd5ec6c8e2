//! Token lifetime configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::parse_or;

/// Default lifetime of a freshly created token (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Token issuance configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Lifetime of new tokens in seconds
    pub ttl_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl TokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            ttl_seconds: parse_or(lookup("TOKEN_TTL_SECONDS"), DEFAULT_TOKEN_TTL_SECONDS),
        }
    }

    /// Token lifetime as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_default() {
        assert_eq!(TokenConfig::default().ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_token_config_from_lookup() {
        let config = TokenConfig::from_lookup(|key| {
            (key == "TOKEN_TTL_SECONDS").then(|| "120".to_string())
        });
        assert_eq!(config.ttl(), Duration::from_secs(120));

        let config = TokenConfig::from_lookup(|_| Some("two minutes".to_string()));
        assert_eq!(config.ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
    }
}

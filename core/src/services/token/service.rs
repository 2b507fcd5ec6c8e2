//! Token lifecycle manager implementation

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use std::time::Duration;

use tk_shared::config::TokenConfig;

use crate::domain::entities::token::Token;
use crate::errors::{TokenError, TokenResult};
use crate::repositories::TokenStore;

use super::generator::{UuidGenerator, ValueGenerator};

/// Upper bound applied to configured token lifetimes
const MAX_TTL_DAYS: i64 = 36_500;

/// Issues, looks up, authenticates and invalidates tokens on top of a store
///
/// The manager keeps no token state of its own: every call goes to the store,
/// which is the single source of truth.
pub struct TokenManager<S: TokenStore, G: ValueGenerator = UuidGenerator> {
    store: Arc<S>,
    generator: G,
    ttl: chrono::Duration,
}

impl<S: TokenStore> TokenManager<S, UuidGenerator> {
    /// Creates a manager issuing UUID v4 token values
    ///
    /// # Arguments
    ///
    /// * `store` - Token store backing every operation
    /// * `ttl` - Lifetime given to newly created tokens
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self::with_generator(store, ttl, UuidGenerator)
    }

    /// Creates a manager taking the token lifetime from configuration
    pub fn from_config(store: Arc<S>, config: &TokenConfig) -> Self {
        Self::new(store, config.ttl())
    }
}

impl<S: TokenStore, G: ValueGenerator> TokenManager<S, G> {
    /// Creates a manager with a custom value generator
    pub fn with_generator(store: Arc<S>, ttl: Duration, generator: G) -> Self {
        let max_ttl = chrono::Duration::days(MAX_TTL_DAYS);
        let ttl = chrono::Duration::from_std(ttl)
            .map(|ttl| ttl.min(max_ttl))
            .unwrap_or(max_ttl);
        Self {
            store,
            generator,
            ttl,
        }
    }

    /// Lifetime given to newly created tokens
    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or_default()
    }

    /// The store backing this manager
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a fresh token for `id`.
    ///
    /// Not idempotent: any token previously issued for `id` is replaced and
    /// stops authenticating immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - The new token with its minute-rounded expiry
    /// * `Err(TokenError::IdNotSet)` - `id` is empty
    /// * `Err(TokenError::Store(_))` - The write failed
    pub async fn create(&self, id: &str) -> TokenResult<Token> {
        ensure_id(id)?;

        let value = self.generator.generate()?;
        let token = Token::new(id, value, Utc::now() + self.ttl);

        self.store
            .set(id, &token.value, token.expire_at)
            .await
            .map_err(|e| {
                tracing::error!(id = id, error = %e, "Failed to store token");
                TokenError::from(e)
            })?;

        tracing::debug!(id = id, expire_at = %token.expire_at, "Created token");

        Ok(token)
    }

    /// Reads the current token for `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - Snapshot of the stored token
    /// * `Err(TokenError::IdNotSet)` - `id` is empty
    /// * `Err(TokenError::NotFound)` - No record exists, including when the
    ///   record vanished between the value read and the TTL read
    /// * `Err(TokenError::Store(_))` - A store read failed
    pub async fn get(&self, id: &str) -> TokenResult<Token> {
        ensure_id(id)?;

        let value = match self.store.get(id).await? {
            Some(value) if !value.is_empty() => value,
            _ => {
                tracing::debug!(id = id, "Token not found");
                return Err(TokenError::NotFound);
            }
        };

        let expire_at = match self.store.expire_at(id).await? {
            Some(expire_at) => expire_at,
            None => {
                tracing::debug!(id = id, "Token disappeared before its TTL was read");
                return Err(TokenError::NotFound);
            }
        };

        Ok(Token::new(id, value, expire_at))
    }

    /// Returns the existing token for `id`, creating one if none exists.
    ///
    /// An existing token is returned untouched; its lifetime is not extended.
    /// Errors other than `NotFound` are returned without creating a token.
    pub async fn get_or_create(&self, id: &str) -> TokenResult<Token> {
        ensure_id(id)?;

        match self.get(id).await {
            Err(TokenError::NotFound) => self.create(id).await,
            other => other,
        }
    }

    /// Checks that `token` matches the token currently stored for its id.
    ///
    /// A missing record and a wrong value both yield `InvalidToken`.
    pub async fn authenticate(&self, token: &Token) -> TokenResult<()> {
        ensure_id(&token.id)?;
        if token.value.is_empty() {
            return Err(TokenError::ValueNotSet);
        }

        let stored = match self.get(&token.id).await {
            Ok(stored) => stored,
            Err(TokenError::NotFound) => {
                tracing::warn!(id = %token.id, "Authentication failed: no token stored");
                return Err(TokenError::InvalidToken);
            }
            Err(e) => return Err(e),
        };

        if !constant_time_eq(stored.value.as_bytes(), token.value.as_bytes()) {
            tracing::warn!(id = %token.id, "Authentication failed: token mismatch");
            return Err(TokenError::InvalidToken);
        }

        Ok(())
    }

    /// Deletes the token for `id`; succeeds when there was none
    pub async fn invalidate(&self, id: &str) -> TokenResult<()> {
        ensure_id(id)?;

        self.store.delete(id).await?;
        tracing::debug!(id = id, "Invalidated token");

        Ok(())
    }
}

fn ensure_id(id: &str) -> TokenResult<()> {
    if id.is_empty() {
        return Err(TokenError::IdNotSet);
    }
    Ok(())
}

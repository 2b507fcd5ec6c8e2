//! Token store trait defining the contract with the TTL-aware key-value store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::errors::StoreError;

/// Remaining lifetime of a store record as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTtl {
    /// No record exists for the key
    Missing,
    /// The record exists but never expires
    NoExpiry,
    /// The record expires in this many seconds
    Seconds(u64),
}

impl RemainingTtl {
    /// Converts the reading into an absolute expiry.
    ///
    /// `skew` is subtracted from a seconds reading; the result never lies
    /// before `now`. A record without expiry counts as zero remaining time.
    /// Returns `None` when the record is missing.
    pub fn expire_at(self, now: DateTime<Utc>, skew: Duration) -> Option<DateTime<Utc>> {
        match self {
            RemainingTtl::Missing => None,
            RemainingTtl::NoExpiry => Some(now),
            RemainingTtl::Seconds(seconds) => {
                let remaining = i64::try_from(seconds)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .unwrap_or(Duration::MAX)
                    - skew;
                let expire_at = now
                    .checked_add_signed(remaining.max(Duration::zero()))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                Some(expire_at)
            }
        }
    }
}

/// Key-value store holding one token value per id
///
/// Implementations own key namespacing and the network connection. Absence
/// of a record is never an error: `get` returns `None` and `remaining_ttl`
/// returns [`RemainingTtl::Missing`].
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Write `value` for `id` expiring at `expire_at`.
    ///
    /// The value and its expiry must be applied as one atomic unit.
    async fn set(&self, id: &str, value: &str, expire_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Read the value stored for `id`
    async fn get(&self, id: &str) -> Result<Option<String>, StoreError>;

    /// Remove the record for `id`; succeeds when nothing was stored
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Ask the store how long the record for `id` has left
    async fn remaining_ttl(&self, id: &str) -> Result<RemainingTtl, StoreError>;

    /// Correction subtracted from every TTL reading
    fn ttl_skew(&self) -> Duration {
        Duration::zero()
    }

    /// Absolute expiry of the record for `id`, `None` when it is missing
    async fn expire_at(&self, id: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let remaining = self.remaining_ttl(id).await?;
        Ok(remaining.expire_at(Utc::now(), self.ttl_skew()))
    }
}

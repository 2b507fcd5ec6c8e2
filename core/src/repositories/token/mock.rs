//! In-memory implementation of TokenStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::StoreError;

use super::store::{RemainingTtl, TokenStore};

type Record = (String, Option<DateTime<Utc>>);

/// Mock token store honouring expiry on read
#[derive(Clone, Default)]
pub struct MockTokenStore {
    records: Arc<RwLock<HashMap<String, Record>>>,
    calls: Arc<AtomicUsize>,
    should_fail: Arc<AtomicBool>,
    lose_ttl: Arc<AtomicBool>,
    ttl_skew_seconds: Arc<AtomicI64>,
}

impl MockTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with a connection error
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Report records as missing on TTL reads, as if they expired between
    /// the value read and the TTL read
    pub fn set_lose_ttl(&self, lose: bool) {
        self.lose_ttl.store(lose, Ordering::SeqCst);
    }

    /// Correction reported by `ttl_skew`, zero unless set
    pub fn set_ttl_skew(&self, seconds: i64) {
        self.ttl_skew_seconds.store(seconds, Ordering::SeqCst);
    }

    /// Store a record that never expires
    pub async fn insert_persistent(&self, id: &str, value: &str) {
        self.records
            .write()
            .await
            .insert(id.to_string(), (value.to_string(), None));
    }

    /// Raw stored value, ignoring expiry and without counting a call
    pub async fn raw_value(&self, id: &str) -> Option<String> {
        self.records.read().await.get(id).map(|(v, _)| v.clone())
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Connection {
                message: "mock store unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn live(&self, id: &str) -> Option<Record> {
        let mut records = self.records.write().await;
        let expired = matches!(records.get(id), Some((_, Some(expire_at))) if *expire_at <= Utc::now());
        if expired {
            records.remove(id);
            return None;
        }
        records.get(id).cloned()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn set(&self, id: &str, value: &str, expire_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.enter()?;
        self.records
            .write()
            .await
            .insert(id.to_string(), (value.to_string(), Some(expire_at)));
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<String>, StoreError> {
        self.enter()?;
        Ok(self.live(id).await.map(|(value, _)| value))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.enter()?;
        self.records.write().await.remove(id);
        Ok(())
    }

    async fn remaining_ttl(&self, id: &str) -> Result<RemainingTtl, StoreError> {
        self.enter()?;
        if self.lose_ttl.load(Ordering::SeqCst) {
            return Ok(RemainingTtl::Missing);
        }

        Ok(match self.live(id).await {
            None => RemainingTtl::Missing,
            Some((_, None)) => RemainingTtl::NoExpiry,
            Some((_, Some(expire_at))) => {
                let seconds = (expire_at - Utc::now()).num_seconds().max(0);
                RemainingTtl::Seconds(seconds as u64)
            }
        })
    }

    fn ttl_skew(&self) -> Duration {
        Duration::seconds(self.ttl_skew_seconds.load(Ordering::SeqCst))
    }
}

//! Unit tests for token creation, lookup and invalidation

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tk_shared::config::TokenConfig;

use crate::domain::entities::token::round_to_minute;
use crate::errors::{StoreError, TokenError};
use crate::repositories::{MockTokenStore, TokenStore};
use crate::services::token::{TokenManager, ValueGenerator};

/// Generates "value-1", "value-2", ...
#[derive(Default)]
pub(super) struct SequenceGenerator {
    next: AtomicUsize,
}

impl ValueGenerator for SequenceGenerator {
    fn generate(&self) -> Result<String, TokenError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("value-{}", n))
    }
}

pub(super) fn create_manager() -> (TokenManager<MockTokenStore, SequenceGenerator>, Arc<MockTokenStore>) {
    let store = Arc::new(MockTokenStore::new());
    let manager = TokenManager::with_generator(
        store.clone(),
        Duration::from_secs(60),
        SequenceGenerator::default(),
    );
    (manager, store)
}

fn within_a_minute_of(actual: chrono::DateTime<Utc>, expected: chrono::DateTime<Utc>) -> bool {
    (actual - expected).num_seconds().abs() <= 60
}

#[tokio::test]
async fn test_create_stores_value() {
    let (manager, store) = create_manager();

    let token = manager.create("3").await.unwrap();

    assert_eq!(token.id, "3");
    assert_eq!(token.value, "value-1");
    assert_eq!(store.raw_value("3").await, Some("value-1".to_string()));
}

#[tokio::test]
async fn test_create_rounds_expiry_to_minute() {
    let (manager, _store) = create_manager();

    let before = Utc::now();
    let token = manager.create("u1").await.unwrap();

    assert_eq!(token.expire_at, round_to_minute(token.expire_at));
    assert!(within_a_minute_of(token.expire_at, before + ChronoDuration::seconds(60)));
}

#[tokio::test]
async fn test_create_uses_uuid_values_by_default() {
    let store = Arc::new(MockTokenStore::new());
    let manager = TokenManager::new(store, Duration::from_secs(60));

    let token = manager.create("u1").await.unwrap();
    assert_eq!(token.value.len(), 36);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (manager, _store) = create_manager();

    let created = manager.create("u1").await.unwrap();
    let fetched = manager.get("u1").await.unwrap();

    assert_eq!(fetched.id, "u1");
    assert_eq!(fetched.value, created.value);
    assert_eq!(fetched.expire_at, created.expire_at);
}

#[tokio::test]
async fn test_create_overwrites_previous_token() {
    let (manager, _store) = create_manager();

    let first = manager.create("u1").await.unwrap();
    let second = manager.create("u1").await.unwrap();

    assert_ne!(first.value, second.value);
    assert_eq!(manager.get("u1").await.unwrap().value, second.value);
}

#[tokio::test]
async fn test_create_propagates_generator_failure() {
    let store = Arc::new(MockTokenStore::new());
    let generator = || -> Result<String, TokenError> {
        Err(TokenError::Generation {
            message: "entropy unavailable".to_string(),
        })
    };
    let manager = TokenManager::with_generator(store.clone(), Duration::from_secs(60), generator);

    let result = manager.create("u1").await;
    assert!(matches!(result, Err(TokenError::Generation { .. })));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_empty_id_is_rejected_without_store_access() {
    let (manager, store) = create_manager();

    assert_eq!(manager.create("").await.unwrap_err(), TokenError::IdNotSet);
    assert_eq!(manager.get("").await.unwrap_err(), TokenError::IdNotSet);
    assert_eq!(manager.invalidate("").await.unwrap_err(), TokenError::IdNotSet);
    assert_eq!(manager.get_or_create("").await.unwrap_err(), TokenError::IdNotSet);

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_get_missing_token() {
    let (manager, _store) = create_manager();

    assert_eq!(manager.get("4").await.unwrap_err(), TokenError::NotFound);
}

#[tokio::test]
async fn test_get_token_written_directly_to_store() {
    let (manager, store) = create_manager();
    let expire_at = round_to_minute(Utc::now() + ChronoDuration::minutes(1));

    store.set("5", "1467", expire_at).await.unwrap();

    let token = manager.get("5").await.unwrap();
    assert_eq!(token.id, "5");
    assert_eq!(token.value, "1467");
    assert_eq!(token.expire_at, expire_at);
}

#[tokio::test]
async fn test_get_applies_ttl_skew() {
    let (manager, store) = create_manager();
    store.set_ttl_skew(4);
    let minute = round_to_minute(Utc::now() + ChronoDuration::minutes(10));

    // 32s past the minute drops below the half-minute once the skew is applied
    let crossing = minute + ChronoDuration::seconds(32);
    store.set("u1", "v1", crossing).await.unwrap();
    let token = manager.get("u1").await.unwrap();
    assert_eq!(token.expire_at, minute);
    assert_eq!(token.expire_at, round_to_minute(crossing - ChronoDuration::seconds(4)));

    let later = minute + ChronoDuration::seconds(45);
    store.set("u2", "v2", later).await.unwrap();
    let token = manager.get("u2").await.unwrap();
    assert_eq!(token.expire_at, minute + ChronoDuration::minutes(1));
}

#[tokio::test]
async fn test_get_without_skew_keeps_stored_minute() {
    let (manager, store) = create_manager();
    let minute = round_to_minute(Utc::now() + ChronoDuration::minutes(10));

    store
        .set("u1", "v1", minute + ChronoDuration::seconds(32))
        .await
        .unwrap();

    let token = manager.get("u1").await.unwrap();
    assert_eq!(token.expire_at, minute + ChronoDuration::minutes(1));
}

#[tokio::test]
async fn test_get_token_without_expiry() {
    let (manager, store) = create_manager();
    store.insert_persistent("u1", "forever").await;

    let before = round_to_minute(Utc::now());
    let token = manager.get("u1").await.unwrap();

    assert_eq!(token.value, "forever");
    assert!(within_a_minute_of(token.expire_at, before));
}

#[tokio::test]
async fn test_get_when_ttl_vanishes_between_reads() {
    let (manager, _store) = create_manager();
    manager.create("u1").await.unwrap();

    manager.store().set_lose_ttl(true);

    assert_eq!(manager.get("u1").await.unwrap_err(), TokenError::NotFound);
}

#[tokio::test]
async fn test_get_propagates_store_failure() {
    let (manager, store) = create_manager();
    store.set_failing(true);

    let error = manager.get("u1").await.unwrap_err();
    assert!(matches!(error, TokenError::Store(StoreError::Connection { .. })));
}

#[tokio::test]
async fn test_get_or_create_returns_existing_token() {
    let (manager, store) = create_manager();
    let created = manager.create("u1").await.unwrap();

    let token = manager.get_or_create("u1").await.unwrap();

    assert_eq!(token.value, created.value);
    assert_eq!(token.expire_at, created.expire_at);
    assert_eq!(store.raw_value("u1").await, Some(created.value));
}

#[tokio::test]
async fn test_get_or_create_creates_missing_token() {
    let (manager, _store) = create_manager();

    let token = manager.get_or_create("u2").await.unwrap();
    let fetched = manager.get("u2").await.unwrap();

    assert_eq!(token.value, "value-1");
    assert_eq!(fetched.value, token.value);
}

#[tokio::test]
async fn test_get_or_create_does_not_create_on_store_failure() {
    let (manager, store) = create_manager();
    store.set_failing(true);

    let error = manager.get_or_create("u1").await.unwrap_err();
    assert!(error.is_store_error());

    store.set_failing(false);
    assert_eq!(store.raw_value("u1").await, None);
}

#[tokio::test]
async fn test_invalidate_missing_token_succeeds() {
    let (manager, _store) = create_manager();

    assert!(manager.invalidate("13").await.is_ok());
}

#[tokio::test]
async fn test_invalidate_removes_token() {
    let (manager, _store) = create_manager();
    manager.create("u1").await.unwrap();

    manager.invalidate("u1").await.unwrap();

    assert_eq!(manager.get("u1").await.unwrap_err(), TokenError::NotFound);
}

#[tokio::test]
async fn test_expired_token_is_not_found() {
    let (manager, store) = create_manager();
    store
        .set("u1", "stale", Utc::now() - ChronoDuration::seconds(1))
        .await
        .unwrap();

    assert_eq!(manager.get("u1").await.unwrap_err(), TokenError::NotFound);
}

#[tokio::test]
async fn test_oversized_ttl_is_capped() {
    let store = Arc::new(MockTokenStore::new());
    let manager = TokenManager::new(store, Duration::from_secs(10_000_000_000_000));

    assert_eq!(manager.ttl(), Duration::from_secs(36_500 * 24 * 60 * 60));

    let before = Utc::now();
    let token = manager.create("u1").await.unwrap();
    assert!(within_a_minute_of(
        token.expire_at,
        before + ChronoDuration::days(36_500)
    ));
}

#[test]
fn test_manager_from_config() {
    let store = Arc::new(MockTokenStore::new());
    let config = TokenConfig { ttl_seconds: 90 };

    let manager = TokenManager::from_config(store, &config);
    assert_eq!(manager.ttl(), Duration::from_secs(90));
}

//! Bearer token value object.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Nanoseconds in one minute
const MINUTE_NANOS: i64 = 60 * 1_000_000_000;

/// Snapshot of a bearer credential held by `id`
///
/// A `Token` is never the source of truth: it is built fresh on every
/// create/get call and validity is always re-derived from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Subject the token authenticates
    pub id: String,

    /// Opaque secret value
    pub value: String,

    /// Absolute expiry, rounded to the nearest minute
    pub expire_at: DateTime<Utc>,
}

impl Token {
    /// Creates a token snapshot, rounding `expire_at` to the nearest minute
    pub fn new(id: impl Into<String>, value: impl Into<String>, expire_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            expire_at: round_to_minute(expire_at),
        }
    }

    /// Builds a token presented by a caller for authentication.
    ///
    /// The expiry of a presented token is never consulted, so it is left at
    /// the Unix epoch.
    pub fn credentials(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            expire_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Rounds a timestamp to the nearest whole minute.
///
/// Halfway values (exactly 30 seconds past the minute) round up.
pub fn round_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs_into_minute = ts.timestamp().rem_euclid(60);
    let nanos = i64::from(ts.timestamp_subsec_nanos().min(999_999_999));
    let into_minute = secs_into_minute * 1_000_000_000 + nanos;

    let floor = Utc
        .timestamp_opt(ts.timestamp() - secs_into_minute, 0)
        .single()
        .unwrap_or(ts);

    if into_minute * 2 >= MINUTE_NANOS {
        floor.checked_add_signed(Duration::minutes(1)).unwrap_or(floor)
    } else {
        floor
    }
}

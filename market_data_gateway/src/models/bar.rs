//! Canonical in-memory representation of a price bar (OHLCV).
//!
//! Every provider maps its wire records into [`Bar`] exactly once; nothing
//! downstream of the gateway ever sees upstream field names or timestamp units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer epoch values below this magnitude are read as seconds, anything
/// larger as milliseconds. 10^11 seconds is the year 5138, 10^11 ms is 1973.
const SECONDS_MAGNITUDE_LIMIT: i64 = 100_000_000_000;

/// A single OHLCV observation for one interval.
///
/// `low <= open, close <= high` is expected from upstream but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Interval start (UTC). Serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the interval.
    pub high: f64,

    /// Lowest price during the interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the interval.
    pub volume: f64,
}

impl Bar {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Converts an upstream epoch value of unknown unit into a UTC timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn timestamp_from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw.unsigned_abs() < SECONDS_MAGNITUDE_LIMIT as u64 {
        DateTime::from_timestamp(raw, 0)
    } else {
        DateTime::from_timestamp_millis(raw)
    }
}

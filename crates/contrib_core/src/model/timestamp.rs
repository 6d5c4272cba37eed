//! Timestamp helpers shared by models.
//!
//! Persisted timestamps are Unix epoch milliseconds in UTC.

use chrono::{DateTime, Utc};

/// Formats epoch milliseconds as a `YYYY-MM-DD` UTC date.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn short_date(epoch_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map(|at| at.format("%Y-%m-%d").to_string())
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

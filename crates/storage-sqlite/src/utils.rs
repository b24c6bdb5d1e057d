//! Shared conversion helpers for DB models.
//!
//! Timestamps are stored as fixed-width UTC strings so that lexicographic
//! comparison on the TEXT column matches chronological order, which lets
//! range filters run directly against the stored value.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::error;

/// Write format: fractional seconds are always 6 digits, keeping every
/// stored value the same width.
const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Read format: `%.f` accepts any fractional-second width.
const READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(WRITE_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, READ_FORMAT)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|e| {
            error!("Failed to parse stored timestamp '{}': {}", raw, e);
            Utc::now()
        })
}

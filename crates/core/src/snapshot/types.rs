//! Strong types for the snapshot system.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC date bucket for daily snapshots.
///
/// Wraps `NaiveDate` to represent a single calendar day. Day boundaries
/// are defined in UTC system-wide; every "one snapshot per day" rule in
/// this crate is expressed in terms of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Day(pub NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a Day from year, month, day components.
    /// Returns None if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The UTC day a timestamp falls on.
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp.date_naive())
    }

    /// Returns the underlying NaiveDate.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns today's date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Day> for NaiveDate {
    fn from(day: Day) -> Self {
        day.0
    }
}

/// Constructs the deterministic id of a holding snapshot.
///
/// Format: `{user_id}_{symbol}_{YYYY-MM-DD}`
///
/// The id doubles as the one-row-per-(user, symbol, day) key: two upserts
/// for the same triple always target the same row.
pub fn snapshot_id(user_id: &str, symbol: &str, day: Day) -> String {
    format!("{}_{}_{}", user_id, symbol, day)
}

//! Staleness gate: the check preventing redundant same-day refresh work.

use std::sync::Arc;

use crate::errors::Result;

use super::store::SnapshotStore;
use super::types::Day;

/// Decides whether a user's snapshots are already fresh for a given day.
///
/// The engine consults the gate once per run and skips the user entirely
/// when it answers `true`. Kept behind a trait so the granularity of the
/// policy can change without touching the engine - the default
/// [`DailyUserGate`] is coarse (per user, not per symbol), which means a
/// partially failed run is not retried until the next calendar day.
pub trait RefreshGate: Send + Sync {
    /// True when the user already has a snapshot on `today` and the run
    /// should be skipped.
    fn is_fresh(&self, user_id: &str, today: Day) -> Result<bool>;
}

/// Per-user daily gate: the user is fresh when their most recent holding
/// snapshot (any symbol) falls on the given UTC day.
///
/// This assumes all of a user's holdings are refreshed together.
pub struct DailyUserGate {
    store: Arc<dyn SnapshotStore>,
}

impl DailyUserGate {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }
}

impl RefreshGate for DailyUserGate {
    fn is_fresh(&self, user_id: &str, today: Day) -> Result<bool> {
        let latest = self.store.latest_snapshot_time(user_id)?;
        Ok(latest.map(Day::of) == Some(today))
    }
}

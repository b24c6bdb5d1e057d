//! In-memory snapshot store shared by the core test suites.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{DatabaseError, Result};
use crate::Error;

use super::snapshot_model::{HoldingSnapshot, PortfolioSnapshot};
use super::store::SnapshotStore;

/// Mock snapshot store backed by plain vectors.
///
/// Upserts key on the snapshot id, which already encodes
/// `(user_id, symbol, day)`, so same-day writes replace the existing row
/// exactly like the real store.
#[derive(Default)]
pub(crate) struct MemorySnapshotStore {
    holding_snapshots: Mutex<Vec<HoldingSnapshot>>,
    portfolio_snapshots: Mutex<Vec<PortfolioSnapshot>>,
    fail_on_write: Mutex<bool>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.lock().unwrap() = fail;
    }

    pub fn holding_snapshots(&self) -> Vec<HoldingSnapshot> {
        self.holding_snapshots.lock().unwrap().clone()
    }

    pub fn portfolio_snapshots(&self) -> Vec<PortfolioSnapshot> {
        self.portfolio_snapshots.lock().unwrap().clone()
    }

    pub fn seed_holding_snapshot(&self, snapshot: HoldingSnapshot) {
        self.holding_snapshots.lock().unwrap().push(snapshot);
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn upsert_holding_snapshot(
        &self,
        snapshot: &HoldingSnapshot,
    ) -> Result<HoldingSnapshot> {
        if *self.fail_on_write.lock().unwrap() {
            return Err(Error::Unexpected("Intentional write failure".into()));
        }
        let mut rows = self.holding_snapshots.lock().unwrap();
        rows.retain(|row| row.id != snapshot.id);
        rows.push(snapshot.clone());
        Ok(snapshot.clone())
    }

    fn latest_snapshots_per_symbol(&self, user_id: &str) -> Result<Vec<HoldingSnapshot>> {
        let rows = self.holding_snapshots.lock().unwrap();
        let mut latest: Vec<HoldingSnapshot> = Vec::new();
        for row in rows.iter().filter(|row| row.user_id == user_id) {
            match latest.iter_mut().find(|kept| kept.symbol == row.symbol) {
                Some(kept) if kept.timestamp < row.timestamp => *kept = row.clone(),
                Some(_) => {}
                None => latest.push(row.clone()),
            }
        }
        Ok(latest)
    }

    fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HoldingSnapshot>> {
        let rows = self.holding_snapshots.lock().unwrap();
        let mut matching: Vec<HoldingSnapshot> = rows
            .iter()
            .filter(|row| row.symbol == symbol && row.timestamp >= start && row.timestamp <= end)
            .cloned()
            .collect();
        if matching.is_empty() {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "No history for {} in range",
                symbol
            ))));
        }
        matching.sort_by_key(|row| row.timestamp);
        Ok(matching)
    }

    async fn append_portfolio_snapshot(
        &self,
        snapshot: &PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot> {
        if *self.fail_on_write.lock().unwrap() {
            return Err(Error::Unexpected("Intentional write failure".into()));
        }
        self.portfolio_snapshots
            .lock()
            .unwrap()
            .push(snapshot.clone());
        Ok(snapshot.clone())
    }

    fn portfolio_history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        let mut rows: Vec<PortfolioSnapshot> = self
            .portfolio_snapshots
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.created_at);
        Ok(rows)
    }

    fn latest_snapshot_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        let rows = self.holding_snapshots.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.timestamp)
            .max())
    }
}

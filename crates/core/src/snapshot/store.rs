//! Snapshot store contract.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::constants::DEFAULT_HISTORY_DAYS;
use crate::errors::Result;

use super::snapshot_model::{HoldingSnapshot, PortfolioSnapshot};

/// Durable keyed storage for per-holding daily snapshots and portfolio
/// rollups.
///
/// Implementations must make `upsert_holding_snapshot` effectively atomic
/// per `(user_id, symbol, day)`: two concurrent upserts for the same key
/// must collapse into one row with the later write's values winning. The
/// SQLite implementation achieves this by funneling every write through a
/// single writer running immediate transactions; any replacement storage
/// needs an equivalent discipline (a transaction-scoped lock or an
/// optimistic retry-on-conflict loop at that granularity is sufficient).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upserts a holding snapshot by `(user_id, symbol, UTC day)`.
    ///
    /// When a row already exists for the key, its `live_price`,
    /// `profit_loss`, `percentage_change`, `current_value` and
    /// `timestamp` are overwritten; otherwise a new row is inserted.
    /// Either the full field set is written or nothing is.
    async fn upsert_holding_snapshot(&self, snapshot: &HoldingSnapshot)
        -> Result<HoldingSnapshot>;

    /// The most recent snapshot per distinct symbol for a user - one row
    /// per symbol, picking the maximum timestamp.
    fn latest_snapshots_per_symbol(&self, user_id: &str) -> Result<Vec<HoldingSnapshot>>;

    /// Snapshots for a symbol whose timestamps fall in `[start, end]`
    /// (inclusive), ascending by timestamp.
    ///
    /// An empty result is reported as `DatabaseError::NotFound` rather
    /// than an empty success list: callers must be able to distinguish
    /// "no history exists" from an ordinary successful read.
    fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HoldingSnapshot>>;

    /// Appends a portfolio snapshot. Pure insert, no deduplication.
    async fn append_portfolio_snapshot(
        &self,
        snapshot: &PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot>;

    /// Portfolio snapshots for a user, ascending by creation time.
    fn portfolio_history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>>;

    /// Timestamp of the user's most recent holding snapshot across all
    /// symbols, or `None` when the user has none. Feeds the staleness
    /// gate.
    fn latest_snapshot_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>>;
}

/// Resolves optional history bounds to a concrete window.
///
/// Missing start defaults to `DEFAULT_HISTORY_DAYS` before `end`; missing
/// end defaults to `now`.
pub fn history_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = end.unwrap_or(now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_HISTORY_DAYS));
    (start, end)
}

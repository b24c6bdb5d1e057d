//! Portfolio aggregation: folds per-holding snapshots into a
//! portfolio-level rollup and persists it as a historical data point.

use std::sync::Arc;

use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::snapshot::{HoldingSnapshot, PortfolioSnapshot, SnapshotStore};

use super::portfolio_model::{PortfolioSummary, StockAnalysis};

/// Folds snapshots into a portfolio summary.
///
/// Sums `total_investment`, `current_value` and `profit_loss` across all
/// entries. `overall_change_pct` is `total_profit_loss / total_investment
/// * 100` when the investment is positive, else exactly zero - an empty
/// or all-zero-cost portfolio is valid, not an error.
pub fn aggregate(user_id: &str, snapshots: &[HoldingSnapshot]) -> PortfolioSummary {
    let mut total_investment = Decimal::ZERO;
    let mut current_value = Decimal::ZERO;
    let mut total_profit_loss = Decimal::ZERO;
    let mut stock_analysis = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        total_investment += snapshot.total_investment;
        current_value += snapshot.current_value;
        total_profit_loss += snapshot.profit_loss;
        stock_analysis.push(StockAnalysis::from(snapshot));
    }

    let overall_change_pct = if total_investment > Decimal::ZERO {
        (total_profit_loss / total_investment * Decimal::from(100)).round_dp(DECIMAL_PRECISION)
    } else {
        Decimal::ZERO
    };

    PortfolioSummary {
        user_id: user_id.to_string(),
        total_investment,
        current_value,
        total_profit_loss,
        overall_change_pct,
        stock_analysis,
    }
}

/// Aggregates a user's latest snapshots and appends the rollup.
pub struct PortfolioAggregator {
    store: Arc<dyn SnapshotStore>,
}

impl PortfolioAggregator {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Folds the latest snapshot per symbol into a summary and persists
    /// it as a new [`PortfolioSnapshot`] row.
    ///
    /// Every call appends - rollups are historical data points, one per
    /// aggregation run. Returns `None` without writing anything when the
    /// user has no snapshots at all.
    pub async fn aggregate_user(&self, user_id: &str) -> Result<Option<PortfolioSummary>> {
        let latest = self.store.latest_snapshots_per_symbol(user_id)?;
        if latest.is_empty() {
            debug!("No snapshots for user {}; skipping rollup", user_id);
            return Ok(None);
        }

        let summary = aggregate(user_id, &latest);
        let snapshot = PortfolioSnapshot {
            id: Uuid::new_v4().to_string(),
            user_id: summary.user_id.clone(),
            total_investment: summary.total_investment,
            current_value: summary.current_value,
            total_profit_loss: summary.total_profit_loss,
            overall_change_pct: summary.overall_change_pct,
            created_at: Utc::now(),
        };
        self.store.append_portfolio_snapshot(&snapshot).await?;

        debug!(
            "Appended portfolio snapshot for user {} ({} position(s))",
            user_id,
            summary.stock_analysis.len()
        );
        Ok(Some(summary))
    }
}

//! Snapshot domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DECIMAL_PRECISION;
use crate::holdings::Holding;
use crate::quotes::Quote;

use super::types::{snapshot_id, Day};

/// The daily fact record of one holding's value.
///
/// At most one row exists per `(user_id, symbol, UTC calendar day)`; the
/// deterministic [`snapshot_id`] encodes that key. Same-day upserts
/// replace `live_price`, `profit_loss`, `percentage_change`,
/// `current_value` and `timestamp` in place - they never create a second
/// row for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSnapshot {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub name: String,
    pub purchase_price: Decimal,
    pub live_price: Decimal,
    pub quantity: Decimal,
    pub profit_loss: Decimal,
    /// Day change of the market price against the previous close, in
    /// percent. `None` when the previous close was zero and the change is
    /// undefined.
    pub percentage_change: Option<Decimal>,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl HoldingSnapshot {
    /// Computes a snapshot from a holding and a fresh quote.
    ///
    /// Derived fields:
    /// - `total_investment = purchase_price * quantity`
    /// - `current_value    = live_price * quantity`
    /// - `profit_loss      = current_value - total_investment` (2 dp)
    /// - `percentage_change` from the quote's day change (2 dp, `None`
    ///   on a zero previous close)
    pub fn compute(holding: &Holding, quote: &Quote, now: DateTime<Utc>) -> Self {
        let total_investment = holding.purchase_price * holding.quantity;
        let current_value = quote.price * holding.quantity;
        let profit_loss = (current_value - total_investment).round_dp(DECIMAL_PRECISION);

        Self {
            id: snapshot_id(&holding.user_id, &quote.symbol, Day::of(now)),
            user_id: holding.user_id.clone(),
            symbol: quote.symbol.clone(),
            name: holding.name.clone(),
            purchase_price: holding.purchase_price,
            live_price: quote.price,
            quantity: holding.quantity,
            profit_loss,
            percentage_change: quote.percent_change(),
            total_investment,
            current_value,
            timestamp: now,
        }
    }

    /// The UTC day this snapshot belongs to.
    pub fn day(&self) -> Day {
        Day::of(self.timestamp)
    }
}

/// Portfolio-level rollup written by the aggregator.
///
/// Append-only: every aggregation run adds one row, deliberately not
/// deduplicated by day, so trend charts get one data point per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub user_id: String,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub overall_change_pct: Decimal,
    pub created_at: DateTime<Utc>,
}

//! Portfolio summary models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::snapshot::HoldingSnapshot;

/// Per-symbol entry of a portfolio summary.
///
/// Carries the same fields as the holding snapshot it was folded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub symbol: String,
    pub name: String,
    pub purchase_price: Decimal,
    pub live_price: Decimal,
    pub quantity: Decimal,
    pub profit_loss: Decimal,
    pub percentage_change: Option<Decimal>,
    pub total_investment: Decimal,
    pub current_value: Decimal,
}

impl From<&HoldingSnapshot> for StockAnalysis {
    fn from(snapshot: &HoldingSnapshot) -> Self {
        Self {
            symbol: snapshot.symbol.clone(),
            name: snapshot.name.clone(),
            purchase_price: snapshot.purchase_price,
            live_price: snapshot.live_price,
            quantity: snapshot.quantity,
            profit_loss: snapshot.profit_loss,
            percentage_change: snapshot.percentage_change,
            total_investment: snapshot.total_investment,
            current_value: snapshot.current_value,
        }
    }
}

/// Result of folding a user's latest snapshots into portfolio totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub user_id: String,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub total_profit_loss: Decimal,
    /// `total_profit_loss / total_investment * 100` (2 dp); exactly zero
    /// for an empty or all-zero-cost portfolio.
    pub overall_change_pct: Decimal,
    pub stock_analysis: Vec<StockAnalysis>,
}

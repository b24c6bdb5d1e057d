//! Quote model shared by all providers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A momentary price/volume reading for one symbol.
///
/// Quotes are ephemeral: they are produced by a provider, consumed
/// immediately by the caller, and never persisted as their own entity.
/// `price` and `previous_close` are always populated; a provider that
/// cannot supply both must return
/// [`MarketDataError::InsufficientHistory`](crate::errors::MarketDataError::InsufficientHistory)
/// instead of a partial quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Uppercased ticker symbol.
    pub symbol: String,
    /// Latest traded/closing price.
    pub price: Decimal,
    /// Close of the previous trading session.
    pub previous_close: Decimal,
    /// Session high, when the provider reports one.
    pub day_high: Option<Decimal>,
    /// Session low, when the provider reports one.
    pub day_low: Option<Decimal>,
    /// Session volume, when the provider reports one.
    pub volume: Option<u64>,
    /// Company name, when the provider reports one.
    pub company_name: Option<String>,
    /// When this quote was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Day change in percent, rounded to 2 decimal places:
    /// `(price - previous_close) / previous_close * 100`.
    ///
    /// Returns `None` when `previous_close` is zero - the change is
    /// undefined and must propagate as an explicit "unavailable" signal
    /// rather than a division fault.
    pub fn percent_change(&self) -> Option<Decimal> {
        if self.previous_close.is_zero() {
            return None;
        }
        let change = (self.price - self.previous_close) / self.previous_close
            * Decimal::from(100);
        Some(change.round_dp(2))
    }
}

//! Reference data models.
//!
//! Unlike holding snapshots these are market-wide, not user-scoped:
//! `StockReference` keeps exactly one row per symbol (the latest known
//! state), while `StockPriceRecord` accumulates one row per fetch event
//! and is never overwritten or deduplicated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quotes::Quote;

/// Latest known market state for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReference {
    pub symbol: String,
    pub company_name: Option<String>,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub percent_change: Option<Decimal>,
    pub day_high: Option<Decimal>,
    pub day_low: Option<Decimal>,
    pub volume: Option<u64>,
    pub last_updated: DateTime<Utc>,
}

impl StockReference {
    /// Builds the reference row for a freshly fetched quote.
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            company_name: quote.company_name.clone(),
            current_price: quote.price,
            previous_close: quote.previous_close,
            percent_change: quote.percent_change(),
            day_high: quote.day_high,
            day_low: quote.day_low,
            volume: quote.volume,
            last_updated: quote.fetched_at,
        }
    }
}

/// One fetch event in the append-only price history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPriceRecord {
    pub id: String,
    pub symbol: String,
    pub recorded_at: DateTime<Utc>,
    pub price: Decimal,
    pub previous_close: Decimal,
    pub percent_change: Option<Decimal>,
    pub day_high: Option<Decimal>,
    pub day_low: Option<Decimal>,
    pub volume: Option<u64>,
}

impl StockPriceRecord {
    /// Builds the history record for a freshly fetched quote.
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symbol: quote.symbol.clone(),
            recorded_at: quote.fetched_at,
            price: quote.price,
            previous_close: quote.previous_close,
            percent_change: quote.percent_change(),
            day_high: quote.day_high,
            day_low: quote.day_low,
            volume: quote.volume,
        }
    }
}

//! Database models for market-wide reference data.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;

use stockfolio_core::reference::{StockPriceRecord, StockReference};

use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for the one-row-per-symbol reference table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::stock_reference)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockReferenceDB {
    pub symbol: String,
    pub company_name: Option<String>,
    pub current_price: String,
    pub previous_close: String,
    pub percent_change: Option<String>,
    pub day_high: Option<String>,
    pub day_low: Option<String>,
    pub volume: Option<i64>,
    pub last_updated: String,
}

impl From<StockReferenceDB> for StockReference {
    fn from(db: StockReferenceDB) -> Self {
        Self {
            symbol: db.symbol,
            company_name: db.company_name,
            current_price: Decimal::from_str(&db.current_price).unwrap_or_default(),
            previous_close: Decimal::from_str(&db.previous_close).unwrap_or_default(),
            percent_change: db
                .percent_change
                .as_deref()
                .and_then(|p| Decimal::from_str(p).ok()),
            day_high: db.day_high.as_deref().and_then(|p| Decimal::from_str(p).ok()),
            day_low: db.day_low.as_deref().and_then(|p| Decimal::from_str(p).ok()),
            volume: db.volume.map(|v| v as u64),
            last_updated: parse_timestamp(&db.last_updated),
        }
    }
}

impl From<&StockReference> for StockReferenceDB {
    fn from(domain: &StockReference) -> Self {
        Self {
            symbol: domain.symbol.clone(),
            company_name: domain.company_name.clone(),
            current_price: domain.current_price.to_string(),
            previous_close: domain.previous_close.to_string(),
            percent_change: domain.percent_change.map(|p| p.to_string()),
            day_high: domain.day_high.map(|p| p.to_string()),
            day_low: domain.day_low.map(|p| p.to_string()),
            volume: domain.volume.map(|v| v as i64),
            last_updated: format_timestamp(domain.last_updated),
        }
    }
}

/// Database model for the append-only price history log.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::stock_price_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockPriceRecordDB {
    pub id: String,
    pub symbol: String,
    pub recorded_at: String,
    pub price: String,
    pub previous_close: String,
    pub percent_change: Option<String>,
    pub day_high: Option<String>,
    pub day_low: Option<String>,
    pub volume: Option<i64>,
}

impl From<StockPriceRecordDB> for StockPriceRecord {
    fn from(db: StockPriceRecordDB) -> Self {
        Self {
            id: db.id,
            symbol: db.symbol,
            recorded_at: parse_timestamp(&db.recorded_at),
            price: Decimal::from_str(&db.price).unwrap_or_default(),
            previous_close: Decimal::from_str(&db.previous_close).unwrap_or_default(),
            percent_change: db
                .percent_change
                .as_deref()
                .and_then(|p| Decimal::from_str(p).ok()),
            day_high: db.day_high.as_deref().and_then(|p| Decimal::from_str(p).ok()),
            day_low: db.day_low.as_deref().and_then(|p| Decimal::from_str(p).ok()),
            volume: db.volume.map(|v| v as u64),
        }
    }
}

impl From<&StockPriceRecord> for StockPriceRecordDB {
    fn from(domain: &StockPriceRecord) -> Self {
        Self {
            id: domain.id.clone(),
            symbol: domain.symbol.clone(),
            recorded_at: format_timestamp(domain.recorded_at),
            price: domain.price.to_string(),
            previous_close: domain.previous_close.to_string(),
            percent_change: domain.percent_change.map(|p| p.to_string()),
            day_high: domain.day_high.map(|p| p.to_string()),
            day_low: domain.day_low.map(|p| p.to_string()),
            volume: domain.volume.map(|v| v as i64),
        }
    }
}

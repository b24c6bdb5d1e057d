//! Database models for holding and portfolio snapshots.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use rust_decimal::Decimal;

use stockfolio_core::snapshot::{HoldingSnapshot, PortfolioSnapshot};

use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for holding snapshots.
///
/// Also loadable from raw SQL (window-function queries), hence the
/// explicit `sql_type` annotations.
#[derive(Debug, Clone, Queryable, QueryableByName, Insertable)]
#[diesel(table_name = crate::schema::holding_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingSnapshotDB {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub user_id: String,
    #[diesel(sql_type = Text)]
    pub symbol: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub purchase_price: String,
    #[diesel(sql_type = Text)]
    pub live_price: String,
    #[diesel(sql_type = Text)]
    pub quantity: String,
    #[diesel(sql_type = Text)]
    pub profit_loss: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub percentage_change: Option<String>,
    #[diesel(sql_type = Text)]
    pub total_investment: String,
    #[diesel(sql_type = Text)]
    pub current_value: String,
    #[diesel(sql_type = Text)]
    pub timestamp: String,
}

/// The field set a same-day upsert overwrites; everything else on the row
/// is immutable for the day.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::holding_snapshots)]
#[diesel(treat_none_as_null = true)]
pub struct HoldingSnapshotChangesDB {
    pub live_price: String,
    pub profit_loss: String,
    pub percentage_change: Option<String>,
    pub current_value: String,
    pub timestamp: String,
}

impl From<&HoldingSnapshot> for HoldingSnapshotChangesDB {
    fn from(domain: &HoldingSnapshot) -> Self {
        Self {
            live_price: domain.live_price.to_string(),
            profit_loss: domain.profit_loss.to_string(),
            percentage_change: domain.percentage_change.map(|p| p.to_string()),
            current_value: domain.current_value.to_string(),
            timestamp: format_timestamp(domain.timestamp),
        }
    }
}

impl From<HoldingSnapshotDB> for HoldingSnapshot {
    fn from(db: HoldingSnapshotDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            symbol: db.symbol,
            name: db.name,
            purchase_price: Decimal::from_str(&db.purchase_price).unwrap_or_default(),
            live_price: Decimal::from_str(&db.live_price).unwrap_or_default(),
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            profit_loss: Decimal::from_str(&db.profit_loss).unwrap_or_default(),
            percentage_change: db
                .percentage_change
                .as_deref()
                .and_then(|p| Decimal::from_str(p).ok()),
            total_investment: Decimal::from_str(&db.total_investment).unwrap_or_default(),
            current_value: Decimal::from_str(&db.current_value).unwrap_or_default(),
            timestamp: parse_timestamp(&db.timestamp),
        }
    }
}

impl From<&HoldingSnapshot> for HoldingSnapshotDB {
    fn from(domain: &HoldingSnapshot) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            symbol: domain.symbol.clone(),
            name: domain.name.clone(),
            purchase_price: domain.purchase_price.to_string(),
            live_price: domain.live_price.to_string(),
            quantity: domain.quantity.to_string(),
            profit_loss: domain.profit_loss.to_string(),
            percentage_change: domain.percentage_change.map(|p| p.to_string()),
            total_investment: domain.total_investment.to_string(),
            current_value: domain.current_value.to_string(),
            timestamp: format_timestamp(domain.timestamp),
        }
    }
}

/// Database model for portfolio snapshots.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioSnapshotDB {
    pub id: String,
    pub user_id: String,
    pub total_investment: String,
    pub current_value: String,
    pub total_profit_loss: String,
    pub overall_change_pct: String,
    pub created_at: String,
}

impl From<PortfolioSnapshotDB> for PortfolioSnapshot {
    fn from(db: PortfolioSnapshotDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            total_investment: Decimal::from_str(&db.total_investment).unwrap_or_default(),
            current_value: Decimal::from_str(&db.current_value).unwrap_or_default(),
            total_profit_loss: Decimal::from_str(&db.total_profit_loss).unwrap_or_default(),
            overall_change_pct: Decimal::from_str(&db.overall_change_pct).unwrap_or_default(),
            created_at: parse_timestamp(&db.created_at),
        }
    }
}

impl From<&PortfolioSnapshot> for PortfolioSnapshotDB {
    fn from(domain: &PortfolioSnapshot) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            total_investment: domain.total_investment.to_string(),
            current_value: domain.current_value.to_string(),
            total_profit_loss: domain.total_profit_loss.to_string(),
            overall_change_pct: domain.overall_change_pct.to_string(),
            created_at: format_timestamp(domain.created_at),
        }
    }
}

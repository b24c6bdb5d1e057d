//! Database model for holdings.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;

use stockfolio_core::holdings::Holding;

use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for holdings. Decimals and timestamps are stored as
/// TEXT.
#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct HoldingDB {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub name: String,
    pub purchase_price: String,
    pub quantity: String,
    pub purchase_date: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            symbol: db.symbol,
            name: db.name,
            purchase_price: Decimal::from_str(&db.purchase_price).unwrap_or_default(),
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            purchase_date: parse_timestamp(&db.purchase_date),
            notes: db.notes,
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

impl From<&Holding> for HoldingDB {
    fn from(domain: &Holding) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            symbol: domain.symbol.clone(),
            name: domain.name.clone(),
            purchase_price: domain.purchase_price.to_string(),
            quantity: domain.quantity.to_string(),
            purchase_date: format_timestamp(domain.purchase_date),
            notes: domain.notes.clone(),
            created_at: format_timestamp(domain.created_at),
            updated_at: format_timestamp(domain.updated_at),
        }
    }
}

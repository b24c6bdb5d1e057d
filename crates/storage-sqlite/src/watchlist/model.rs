//! Database model for watchlists.

use diesel::prelude::*;

use stockfolio_core::watchlist::Watchlist;

use crate::utils::{format_timestamp, parse_timestamp};

/// Database model for watchlists. The symbol set is stored as a JSON
/// array.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::watchlists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistDB {
    pub user_id: String,
    pub symbols: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WatchlistDB> for Watchlist {
    fn from(db: WatchlistDB) -> Self {
        Self {
            user_id: db.user_id,
            symbols: serde_json::from_str(&db.symbols).unwrap_or_default(),
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

impl From<&Watchlist> for WatchlistDB {
    fn from(domain: &Watchlist) -> Self {
        Self {
            user_id: domain.user_id.clone(),
            symbols: serde_json::to_string(&domain.symbols).unwrap_or_else(|_| "[]".to_string()),
            created_at: format_timestamp(domain.created_at),
            updated_at: format_timestamp(domain.updated_at),
        }
    }
}

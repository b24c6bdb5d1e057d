//! Watchlist domain models.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's watched symbols.
///
/// `symbols` is a set: membership is unique by construction, and no
/// ordering is guaranteed on output - callers must not rely on the
/// iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub user_id: String,
    pub symbols: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Watchlist {
    /// An empty watchlist for a user.
    pub fn empty(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            symbols: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of refreshing every symbol on a watchlist.
///
/// `updated` is a set - a symbol appears at most once however the
/// refresh loop reached it. Per-symbol errors never abort the loop.
#[derive(Debug, Clone, Default)]
pub struct WatchlistRefreshReport {
    pub updated: HashSet<String>,
    pub errors: HashMap<String, String>,
}

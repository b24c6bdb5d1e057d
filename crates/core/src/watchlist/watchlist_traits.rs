//! Watchlist repository trait.

use async_trait::async_trait;

use super::watchlist_model::Watchlist;
use crate::errors::Result;

/// Persistence contract for watchlists. One row per user.
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    /// The user's watchlist, or `None` when they never created one.
    fn get(&self, user_id: &str) -> Result<Option<Watchlist>>;

    /// Upserts the user's watchlist row.
    async fn save(&self, watchlist: &Watchlist) -> Result<Watchlist>;
}

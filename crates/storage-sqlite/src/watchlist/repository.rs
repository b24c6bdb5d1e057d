use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::watchlists;
use crate::schema::watchlists::dsl as watchlists_dsl;

use super::model::WatchlistDB;
use stockfolio_core::errors::Result;
use stockfolio_core::watchlist::{Watchlist, WatchlistRepositoryTrait};

/// Repository for watchlists; one row per user.
pub struct WatchlistRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WatchlistRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    fn get(&self, user_id: &str) -> Result<Option<Watchlist>> {
        let mut conn = get_connection(&self.pool)?;

        let row = watchlists_dsl::watchlists
            .find(user_id)
            .first::<WatchlistDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Watchlist::from))
    }

    async fn save(&self, watchlist: &Watchlist) -> Result<Watchlist> {
        let watchlist = watchlist.clone();
        let row = WatchlistDB::from(&watchlist);

        self.writer
            .exec(move |conn| {
                diesel::replace_into(watchlists::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        Ok(watchlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_db};
    use chrono::Utc;

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let db = test_db();
        seed_user(&db.pool, "u1");
        let repo = WatchlistRepository::new(db.pool.clone(), db.writer.clone());

        assert!(repo.get("u1").unwrap().is_none());

        let mut watchlist = Watchlist::empty("u1", Utc::now());
        watchlist.symbols.insert("AAPL".to_string());
        watchlist.symbols.insert("MSFT".to_string());
        repo.save(&watchlist).await.unwrap();

        let loaded = repo.get("u1").unwrap().unwrap();
        assert_eq!(loaded.symbols.len(), 2);
        assert!(loaded.symbols.contains("AAPL"));

        // Saving again replaces the single row.
        watchlist.symbols.remove("AAPL");
        repo.save(&watchlist).await.unwrap();
        let reloaded = repo.get("u1").unwrap().unwrap();
        assert_eq!(reloaded.symbols.len(), 1);
    }
}

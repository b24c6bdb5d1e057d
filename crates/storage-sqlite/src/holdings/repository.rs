use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::holdings;
use crate::schema::holdings::dsl as holdings_dsl;
use crate::utils::format_timestamp;

use super::model::HoldingDB;
use stockfolio_core::errors::{DatabaseError, Result};
use stockfolio_core::holdings::{Holding, HoldingPatch, HoldingRepositoryTrait, NewHolding};
use stockfolio_core::Error;

/// Repository for managing holdings in the database.
pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    /// Creates a new HoldingRepository instance.
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    async fn create(&self, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate()?;

        let now = Utc::now();
        let holding = Holding {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_holding.user_id.clone(),
            symbol: new_holding.normalized_symbol(),
            name: new_holding.name.clone(),
            purchase_price: new_holding.purchase_price,
            quantity: new_holding.quantity,
            purchase_date: new_holding.purchase_date.unwrap_or(now),
            notes: new_holding.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        let row = HoldingDB::from(&holding);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(holdings::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        Ok(holding)
    }

    async fn update(
        &self,
        holding_id: &str,
        user_id: &str,
        patch: HoldingPatch,
    ) -> Result<Holding> {
        patch.validate()?;

        let holding_id = holding_id.to_string();
        let user_id = user_id.to_string();

        self.writer
            .exec(move |conn| {
                let existing: HoldingDB = holdings_dsl::holdings
                    .filter(holdings_dsl::id.eq(&holding_id))
                    .filter(holdings_dsl::user_id.eq(&user_id))
                    .first::<HoldingDB>(conn)
                    .into_core()?;

                let mut updated = patch.apply(&Holding::from(existing));
                updated.updated_at = Utc::now();

                let row = HoldingDB::from(&updated);
                diesel::update(holdings_dsl::holdings.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;

                Ok(updated)
            })
            .await
    }

    async fn delete(&self, holding_id: &str, user_id: &str) -> Result<usize> {
        let holding_id = holding_id.to_string();
        let user_id = user_id.to_string();

        self.writer
            .exec(move |conn| {
                let affected = diesel::delete(
                    holdings_dsl::holdings
                        .filter(holdings_dsl::id.eq(&holding_id))
                        .filter(holdings_dsl::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;

                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Holding {} not found",
                        holding_id
                    ))));
                }
                Ok(affected)
            })
            .await
    }

    fn get_by_id(&self, holding_id: &str, user_id: &str) -> Result<Holding> {
        let mut conn = get_connection(&self.pool)?;

        let row = holdings_dsl::holdings
            .filter(holdings_dsl::id.eq(holding_id))
            .filter(holdings_dsl::user_id.eq(user_id))
            .first::<HoldingDB>(&mut conn)
            .into_core()?;

        Ok(row.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings_dsl::holdings
            .filter(holdings_dsl::user_id.eq(user_id))
            .order(holdings_dsl::symbol.asc())
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Holding::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_db};
    use rust_decimal_macros::dec;

    fn new_holding(user_id: &str, symbol: &str) -> NewHolding {
        NewHolding {
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            name: format!("{} Corp", symbol),
            purchase_price: dec!(150.00),
            quantity: dec!(10),
            purchase_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_round_trip() {
        let db = test_db();
        seed_user(&db.pool, "u1");
        let repo = HoldingRepository::new(db.pool.clone(), db.writer.clone());

        repo.create(new_holding("u1", "aapl")).await.unwrap();
        repo.create(new_holding("u1", "MSFT")).await.unwrap();

        let holdings = repo.list_for_user("u1").unwrap();
        assert_eq!(holdings.len(), 2);
        // Stored uppercased, listed by symbol.
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[0].purchase_price, dec!(150.00));
        assert_eq!(holdings[1].symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_keeps_unset_fields() {
        let db = test_db();
        seed_user(&db.pool, "u1");
        let repo = HoldingRepository::new(db.pool.clone(), db.writer.clone());

        let created = repo.create(new_holding("u1", "AAPL")).await.unwrap();
        let patch = HoldingPatch {
            quantity: Some(dec!(42)),
            ..Default::default()
        };
        let updated = repo.update(&created.id, "u1", patch).await.unwrap();

        assert_eq!(updated.quantity, dec!(42));
        assert_eq!(updated.purchase_price, dec!(150.00));
        assert_eq!(updated.name, "AAPL Corp");
    }

    #[tokio::test]
    async fn test_update_rejects_foreign_user() {
        let db = test_db();
        seed_user(&db.pool, "u1");
        seed_user(&db.pool, "u2");
        let repo = HoldingRepository::new(db.pool.clone(), db.writer.clone());

        let created = repo.create(new_holding("u1", "AAPL")).await.unwrap();
        let err = repo
            .update(&created.id, "u2", HoldingPatch::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let db = test_db();
        seed_user(&db.pool, "u1");
        let repo = HoldingRepository::new(db.pool.clone(), db.writer.clone());

        let created = repo.create(new_holding("u1", "AAPL")).await.unwrap();
        assert_eq!(repo.delete(&created.id, "u1").await.unwrap(), 1);
        assert!(repo.list_for_user("u1").unwrap().is_empty());

        let err = repo.delete(&created.id, "u1").await.unwrap_err();
        assert!(err.is_not_found());
    }
}

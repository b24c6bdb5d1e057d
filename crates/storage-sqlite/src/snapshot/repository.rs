use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::holding_snapshots;
use crate::schema::holding_snapshots::dsl as snapshots_dsl;
use crate::schema::portfolio_snapshots;
use crate::schema::portfolio_snapshots::dsl as portfolio_dsl;
use crate::utils::{format_timestamp, parse_timestamp};

use super::model::{HoldingSnapshotChangesDB, HoldingSnapshotDB, PortfolioSnapshotDB};
use stockfolio_core::errors::{DatabaseError, Result};
use stockfolio_core::snapshot::{HoldingSnapshot, PortfolioSnapshot, SnapshotStore};
use stockfolio_core::Error;

/// Repository for holding and portfolio snapshots.
///
/// All mutations run on the writer actor, which executes each job inside
/// an immediate transaction on a single dedicated connection. That is the
/// serialization point required for the upsert's lookup-then-write to be
/// race-free per `(user_id, symbol, day)`.
pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotStore for SnapshotRepository {
    async fn upsert_holding_snapshot(
        &self,
        snapshot: &HoldingSnapshot,
    ) -> Result<HoldingSnapshot> {
        let snapshot = snapshot.clone();

        self.writer
            .exec(move |conn| {
                // Day window of the snapshot's own timestamp, as stored
                // strings; the fixed-width format makes the comparison
                // chronological.
                let day = snapshot.day().date();
                let day_start = format_timestamp(day.and_hms_opt(0, 0, 0).unwrap().and_utc());
                let day_end = format_timestamp(
                    (day + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap().and_utc(),
                );

                let existing: Option<String> = snapshots_dsl::holding_snapshots
                    .filter(snapshots_dsl::user_id.eq(&snapshot.user_id))
                    .filter(snapshots_dsl::symbol.eq(&snapshot.symbol))
                    .filter(snapshots_dsl::timestamp.ge(&day_start))
                    .filter(snapshots_dsl::timestamp.lt(&day_end))
                    .select(snapshots_dsl::id)
                    .first::<String>(conn)
                    .optional()
                    .into_core()?;

                match existing {
                    Some(existing_id) => {
                        let changes = HoldingSnapshotChangesDB::from(&snapshot);
                        diesel::update(snapshots_dsl::holding_snapshots.find(existing_id))
                            .set(&changes)
                            .execute(conn)
                            .into_core()?;
                    }
                    None => {
                        let row = HoldingSnapshotDB::from(&snapshot);
                        diesel::insert_into(holding_snapshots::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                    }
                }

                Ok(snapshot.clone())
            })
            .await
    }

    fn latest_snapshots_per_symbol(&self, user_id: &str) -> Result<Vec<HoldingSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let sql = "WITH RankedSnapshots AS ( \
                SELECT \
                    s.*, \
                    ROW_NUMBER() OVER (PARTITION BY s.symbol ORDER BY s.timestamp DESC) as rn \
                FROM holding_snapshots s WHERE s.user_id = ? \
            ) \
            SELECT * FROM RankedSnapshots WHERE rn = 1 \
            ORDER BY symbol";

        let rows: Vec<HoldingSnapshotDB> = sql_query(sql)
            .bind::<Text, _>(user_id)
            .load::<HoldingSnapshotDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(HoldingSnapshot::from).collect())
    }

    fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HoldingSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let start_str = format_timestamp(start);
        let end_str = format_timestamp(end);

        let rows = snapshots_dsl::holding_snapshots
            .filter(snapshots_dsl::symbol.eq(symbol))
            .filter(snapshots_dsl::timestamp.ge(&start_str))
            .filter(snapshots_dsl::timestamp.le(&end_str))
            .order(snapshots_dsl::timestamp.asc())
            .load::<HoldingSnapshotDB>(&mut conn)
            .into_core()?;

        // "No history in range" is a distinct signal, not an empty
        // success.
        if rows.is_empty() {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "No history for {} in the given date range",
                symbol
            ))));
        }

        Ok(rows.into_iter().map(HoldingSnapshot::from).collect())
    }

    async fn append_portfolio_snapshot(
        &self,
        snapshot: &PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot> {
        let snapshot = snapshot.clone();
        let row = PortfolioSnapshotDB::from(&snapshot);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(portfolio_snapshots::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        Ok(snapshot)
    }

    fn portfolio_history(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = portfolio_dsl::portfolio_snapshots
            .filter(portfolio_dsl::user_id.eq(user_id))
            .order(portfolio_dsl::created_at.asc())
            .load::<PortfolioSnapshotDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(PortfolioSnapshot::from).collect())
    }

    fn latest_snapshot_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut conn = get_connection(&self.pool)?;

        let latest: Option<String> = snapshots_dsl::holding_snapshots
            .filter(snapshots_dsl::user_id.eq(user_id))
            .select(diesel::dsl::max(snapshots_dsl::timestamp))
            .first::<Option<String>>(&mut conn)
            .into_core()?;

        Ok(latest.as_deref().map(parse_timestamp))
    }
}

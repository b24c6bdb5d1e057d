use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::stock_price_history;
use crate::schema::stock_price_history::dsl as history_dsl;
use crate::schema::stock_reference;
use crate::schema::stock_reference::dsl as reference_dsl;
use crate::utils::format_timestamp;

use super::model::{StockPriceRecordDB, StockReferenceDB};
use stockfolio_core::errors::Result;
use stockfolio_core::reference::{ReferenceDataStore, StockPriceRecord, StockReference};

/// Repository for market-wide reference data.
pub struct ReferenceDataRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ReferenceDataRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ReferenceDataStore for ReferenceDataRepository {
    fn get_reference(&self, symbol: &str) -> Result<Option<StockReference>> {
        let mut conn = get_connection(&self.pool)?;

        let row = reference_dsl::stock_reference
            .find(symbol)
            .first::<StockReferenceDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(StockReference::from))
    }

    fn list_references(&self, symbols: &[String]) -> Result<Vec<StockReference>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;

        let rows = reference_dsl::stock_reference
            .filter(reference_dsl::symbol.eq_any(symbols))
            .load::<StockReferenceDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(StockReference::from).collect())
    }

    async fn record_fetch(
        &self,
        reference: &StockReference,
        record: &StockPriceRecord,
    ) -> Result<()> {
        let reference_row = StockReferenceDB::from(reference);
        let record_row = StockPriceRecordDB::from(record);

        // Both writes run in the same writer transaction: the reference
        // row is replaced and the history row appended, or neither.
        self.writer
            .exec(move |conn| {
                diesel::replace_into(stock_reference::table)
                    .values(&reference_row)
                    .execute(conn)
                    .into_core()?;
                diesel::insert_into(stock_price_history::table)
                    .values(&record_row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockPriceRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let start_str = format_timestamp(start);
        let end_str = format_timestamp(end);

        let rows = history_dsl::stock_price_history
            .filter(history_dsl::symbol.eq(symbol))
            .filter(history_dsl::recorded_at.ge(&start_str))
            .filter(history_dsl::recorded_at.le(&end_str))
            .order(history_dsl::recorded_at.asc())
            .load::<StockPriceRecordDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(StockPriceRecord::from).collect())
    }
}

//! Reference data store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::reference_model::{StockPriceRecord, StockReference};
use crate::errors::Result;

/// Storage for market-wide reference data.
#[async_trait]
pub trait ReferenceDataStore: Send + Sync {
    /// The latest known state for a symbol, if any.
    fn get_reference(&self, symbol: &str) -> Result<Option<StockReference>>;

    /// Latest known state for each of the given symbols. Symbols without
    /// a stored row are simply absent from the result.
    fn list_references(&self, symbols: &[String]) -> Result<Vec<StockReference>>;

    /// Records one fetch event: replaces the symbol's reference row and
    /// appends one price history record, atomically - either both writes
    /// land or neither does.
    async fn record_fetch(
        &self,
        reference: &StockReference,
        record: &StockPriceRecord,
    ) -> Result<()>;

    /// Price history records for a symbol in `[start, end]` (inclusive),
    /// ascending by `recorded_at`. An empty log is an ordinary empty
    /// result here - this is the raw fetch log, not the user-facing
    /// snapshot history.
    fn price_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockPriceRecord>>;
}

//! Reference data refresh.

use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::quotes::QuoteGateway;

use super::reference_model::{StockPriceRecord, StockReference};
use super::reference_traits::ReferenceDataStore;

/// Keeps market-wide reference data current against the quote gateway.
pub struct ReferenceDataService {
    gateway: Arc<dyn QuoteGateway>,
    store: Arc<dyn ReferenceDataStore>,
}

impl ReferenceDataService {
    pub fn new(gateway: Arc<dyn QuoteGateway>, store: Arc<dyn ReferenceDataStore>) -> Self {
        Self { gateway, store }
    }

    /// Fetches a fresh quote and records it: the reference row is
    /// replaced with the latest state and one history record is appended.
    pub async fn refresh_symbol(&self, symbol: &str) -> Result<StockReference> {
        let quote = self.gateway.fetch(symbol).await?;

        let reference = StockReference::from_quote(&quote);
        let record = StockPriceRecord::from_quote(&quote);
        self.store.record_fetch(&reference, &record).await?;

        debug!("Recorded reference data fetch for {}", symbol);
        Ok(reference)
    }

    /// Returns the stored reference row when one exists, fetching only
    /// for symbols seen for the first time.
    pub async fn ensure_symbol(&self, symbol: &str) -> Result<StockReference> {
        if let Some(existing) = self.store.get_reference(symbol)? {
            return Ok(existing);
        }
        self.refresh_symbol(symbol).await
    }

    /// Stored reference rows for the given symbols; symbols never fetched
    /// are absent.
    pub fn get_references(&self, symbols: &[String]) -> Result<Vec<StockReference>> {
        self.store.list_references(symbols)
    }
}

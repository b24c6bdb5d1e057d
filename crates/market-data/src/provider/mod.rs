//! Market data provider trait definitions.

pub mod yahoo;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Implementations must be pure fetchers: no retries, no caching of
/// failures, no persistence. Network timeouts are the implementation's
/// responsibility to enforce and must surface as
/// [`MarketDataError::Timeout`].
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and
    /// error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a symbol.
    ///
    /// The symbol must already be uppercased by the caller. Returns
    /// [`MarketDataError::InsufficientHistory`] when fewer than two
    /// trading sessions exist for the symbol - callers treat that as a
    /// definitive "no data yet", not a transient failure.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}

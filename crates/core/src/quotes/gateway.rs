//! Gateway over the external quote provider.
//!
//! The gateway normalizes provider responses and classifies failures into
//! the two-kind [`QuoteError`] taxonomy. It applies no retry of its own -
//! the caller decides what a failure means.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use stockfolio_market_data::{MarketDataError, Quote, QuoteProvider};

use super::errors::QuoteError;

/// The narrow interface through which the reconciliation engine reaches
/// the market. Pure fetch: no side effects, no persistence.
#[async_trait]
pub trait QuoteGateway: Send + Sync {
    /// Fetch the latest quote for a symbol.
    ///
    /// The symbol must be non-empty and already uppercased by the caller,
    /// so that one instrument is never tracked under two case variants.
    async fn fetch(&self, symbol: &str) -> std::result::Result<Quote, QuoteError>;
}

/// Gateway backed by a [`QuoteProvider`] from the market-data crate.
pub struct ProviderQuoteGateway {
    provider: Arc<dyn QuoteProvider>,
}

impl ProviderQuoteGateway {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Classify a provider error into the engine-facing taxonomy.
    fn classify(symbol: &str, err: MarketDataError) -> QuoteError {
        if err.is_terminal() {
            QuoteError::InsufficientHistory {
                symbol: symbol.to_string(),
                reason: err.to_string(),
            }
        } else {
            QuoteError::ProviderUnavailable(err.to_string())
        }
    }
}

#[async_trait]
impl QuoteGateway for ProviderQuoteGateway {
    async fn fetch(&self, symbol: &str) -> std::result::Result<Quote, QuoteError> {
        debug!("Fetching quote for {} via {}", symbol, self.provider.id());
        self.provider
            .get_quote(symbol)
            .await
            .map_err(|e| Self::classify(symbol, e))
    }
}

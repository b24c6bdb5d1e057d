//! Tests for quote gateway failure classification.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;

use stockfolio_market_data::{MarketDataError, Quote, QuoteProvider};

use super::{ProviderQuoteGateway, QuoteError, QuoteGateway};

/// Provider stub that always returns a preconfigured outcome.
struct StubProvider {
    outcome: fn() -> Result<Quote, MarketDataError>,
}

#[async_trait]
impl QuoteProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn get_quote(&self, _symbol: &str) -> Result<Quote, MarketDataError> {
        (self.outcome)()
    }
}

fn gateway(outcome: fn() -> Result<Quote, MarketDataError>) -> ProviderQuoteGateway {
    ProviderQuoteGateway::new(Arc::new(StubProvider { outcome }))
}

fn sample_quote() -> Quote {
    Quote {
        symbol: "AAPL".to_string(),
        price: dec!(190.25),
        previous_close: dec!(187.44),
        day_high: None,
        day_low: None,
        volume: None,
        company_name: None,
        fetched_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_successful_fetch_passes_quote_through() {
    let gw = gateway(|| Ok(sample_quote()));
    let quote = gw.fetch("AAPL").await.unwrap();
    assert_eq!(quote.price, dec!(190.25));
}

#[tokio::test]
async fn test_insufficient_history_classified_as_data_unavailable() {
    let gw = gateway(|| {
        Err(MarketDataError::InsufficientHistory {
            symbol: "NEWIPO".to_string(),
        })
    });
    let err = gw.fetch("NEWIPO").await.unwrap_err();
    assert!(matches!(err, QuoteError::InsufficientHistory { .. }));
    assert!(err.is_unavailable_data());
}

#[tokio::test]
async fn test_unknown_symbol_classified_as_data_unavailable() {
    let gw = gateway(|| Err(MarketDataError::SymbolNotFound("NOPE".to_string())));
    let err = gw.fetch("NOPE").await.unwrap_err();
    assert!(matches!(err, QuoteError::InsufficientHistory { .. }));
}

#[tokio::test]
async fn test_timeout_classified_as_provider_unavailable() {
    let gw = gateway(|| {
        Err(MarketDataError::Timeout {
            provider: "STUB".to_string(),
        })
    });
    let err = gw.fetch("AAPL").await.unwrap_err();
    assert!(matches!(err, QuoteError::ProviderUnavailable(_)));
}

#[tokio::test]
async fn test_rate_limit_classified_as_provider_unavailable() {
    let gw = gateway(|| {
        Err(MarketDataError::RateLimited {
            provider: "STUB".to_string(),
        })
    });
    let err = gw.fetch("AAPL").await.unwrap_err();
    assert!(matches!(err, QuoteError::ProviderUnavailable(_)));
}

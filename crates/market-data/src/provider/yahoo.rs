//! Yahoo Finance quote provider.
//!
//! Fetches the last two daily bars from the Yahoo chart API and derives
//! `price` / `previous_close` from the two most recent closes. Symbols
//! with fewer than two sessions of history surface as
//! `InsufficientHistory`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "YAHOO";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Chart API response envelope
// ============================================================================

mod models {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ChartResponse {
        pub chart: Chart,
    }

    #[derive(Debug, Deserialize)]
    pub struct Chart {
        #[serde(default)]
        pub result: Vec<ChartResult>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChartResult {
        pub meta: ChartMeta,
        pub indicators: Indicators,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChartMeta {
        pub symbol: String,
        #[serde(default)]
        pub long_name: Option<String>,
        #[serde(default)]
        pub short_name: Option<String>,
        #[serde(default)]
        pub regular_market_day_high: Option<f64>,
        #[serde(default)]
        pub regular_market_day_low: Option<f64>,
        #[serde(default)]
        pub regular_market_volume: Option<u64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Indicators {
        #[serde(default)]
        pub quote: Vec<QuoteBars>,
    }

    /// One parallel-array block of daily bars. Entries are `None` on
    /// holidays/half-sessions, so consumers must filter before indexing.
    #[derive(Debug, Default, Deserialize)]
    pub struct QuoteBars {
        #[serde(default)]
        pub close: Vec<Option<f64>>,
        #[serde(default)]
        pub high: Vec<Option<f64>>,
        #[serde(default)]
        pub low: Vec<Option<f64>>,
        #[serde(default)]
        pub volume: Vec<Option<u64>>,
    }
}

use models::{ChartResponse, ChartResult};

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with a bounded request timeout.
    pub fn new() -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Convert a chart API result into a [`Quote`].
    ///
    /// Requires at least two non-null closes; the last one is the live
    /// price and the one before it the previous close.
    fn quote_from_chart(symbol: &str, result: &ChartResult) -> Result<Quote, MarketDataError> {
        let bars = result.indicators.quote.first().ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!("No quote bars in chart response for {}", symbol),
            }
        })?;

        let closes: Vec<f64> = bars.close.iter().filter_map(|c| *c).collect();
        if closes.len() < 2 {
            return Err(MarketDataError::InsufficientHistory {
                symbol: symbol.to_string(),
            });
        }

        let price = to_decimal(closes[closes.len() - 1], "close", symbol)?;
        let previous_close = to_decimal(closes[closes.len() - 2], "previous close", symbol)?;

        let last_high = last_value(&bars.high).or(result.meta.regular_market_day_high);
        let last_low = last_value(&bars.low).or(result.meta.regular_market_day_low);
        let last_volume = last_value(&bars.volume).or(result.meta.regular_market_volume);

        let company_name = result
            .meta
            .long_name
            .clone()
            .or_else(|| result.meta.short_name.clone());

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            previous_close,
            day_high: last_high.and_then(Decimal::from_f64),
            day_low: last_low.and_then(Decimal::from_f64),
            volume: last_volume,
            company_name,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/{}?range=5d&interval=1d", CHART_URL, symbol);
        debug!("Fetching quote for {} from Yahoo chart API", symbol);

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("HTTP {} for {}", status, symbol),
                });
            }
            _ => {}
        }

        let data: ChartResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse chart response: {}", e),
                })?;

        let result = data
            .chart
            .result
            .first()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Self::quote_from_chart(symbol, result)
    }
}

fn last_value<T: Copy>(values: &[Option<T>]) -> Option<T> {
    values.iter().rev().find_map(|v| *v)
}

fn to_decimal(value: f64, field: &str, symbol: &str) -> Result<Decimal, MarketDataError> {
    Decimal::from_f64(value).ok_or_else(|| MarketDataError::ValidationFailed {
        message: format!("Failed to convert {} {} for {} to Decimal", field, value, symbol),
    })
}

//! Quote-related error types.

use thiserror::Error;

/// Errors the quote gateway can surface to the reconciliation engine.
///
/// Both kinds mean "skip this symbol, continue with the others" to
/// callers; they differ only in what happens on later runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// The symbol cannot produce a usable price right now: fewer than two
    /// trading sessions of history exist, or the provider does not
    /// recognize the symbol at all. This is a definitive "no data yet"
    /// state, not a transient failure.
    #[error("No usable quote for {symbol}: {reason}")]
    InsufficientHistory {
        /// The symbol lacking data
        symbol: String,
        /// Provider-supplied detail
        reason: String,
    },

    /// The provider could not be reached or refused the request
    /// (network failure, timeout, rate limit). Transient; the next
    /// scheduled run is the retry mechanism.
    #[error("Quote provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl QuoteError {
    /// True for the definitive "no data for this symbol" case.
    pub fn is_unavailable_data(&self) -> bool {
        matches!(self, QuoteError::InsufficientHistory { .. })
    }
}

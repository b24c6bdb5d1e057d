//! Error types for the market data crate.
//!
//! Every variant is classified as either terminal (retrying within the same
//! run will not help) or transient (the next scheduled run may succeed).
//! Callers use [`MarketDataError::is_terminal`] to decide how to record a
//! failure; nothing in this crate retries on its own.

use thiserror::Error;

/// Errors that can occur while fetching market data.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol is unknown to the provider.
    /// Terminal - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has fewer than two trading sessions of
    /// history, so no usable price/previous-close pair is available yet.
    /// This is a definitive "no data yet" state, not a failure.
    #[error("Insufficient history for {symbol}: fewer than two sessions")]
    InsufficientHistory {
        /// The symbol lacking history
        symbol: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns true if this error is terminal: the symbol itself cannot
    /// produce a usable quote right now, and retrying within the same run
    /// is pointless.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::SymbolNotFound(_) | Self::InsufficientHistory { .. } | Self::ValidationFailed { .. }
        )
    }

    /// Returns true if this error is transient and a later run may succeed.
    pub fn is_transient(&self) -> bool {
        !self.is_terminal()
    }
}

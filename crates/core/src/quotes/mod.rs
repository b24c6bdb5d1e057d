//! Quote gateway: the narrow interface to the external quote provider.

mod errors;
mod gateway;

pub use errors::QuoteError;
pub use gateway::{ProviderQuoteGateway, QuoteGateway};

pub use stockfolio_market_data::Quote;

#[cfg(test)]
mod gateway_tests;

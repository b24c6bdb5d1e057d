//! Market-wide stock reference data and its append-only price history.

pub mod reference_model;
pub mod reference_service;
pub mod reference_traits;

pub use reference_model::{StockPriceRecord, StockReference};
pub use reference_service::ReferenceDataService;
pub use reference_traits::ReferenceDataStore;

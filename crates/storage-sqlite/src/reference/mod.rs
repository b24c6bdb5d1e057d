mod model;
mod repository;

pub use model::{StockPriceRecordDB, StockReferenceDB};
pub use repository::ReferenceDataRepository;

mod model;
mod repository;

pub use model::{HoldingSnapshotDB, PortfolioSnapshotDB};
pub use repository::SnapshotRepository;

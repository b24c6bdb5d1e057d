//! Snapshot reconciliation: models, store contract, staleness gate, and
//! the per-user reconciliation engine.

pub mod engine;
pub mod gate;
pub mod snapshot_model;
pub mod store;
pub mod types;

pub use engine::{FailureReason, ReconciliationEngine, ReconciliationReport};
pub use gate::{DailyUserGate, RefreshGate};
pub use snapshot_model::{HoldingSnapshot, PortfolioSnapshot};
pub use store::{history_window, SnapshotStore};
pub use types::{snapshot_id, Day};

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
pub(crate) mod testing;

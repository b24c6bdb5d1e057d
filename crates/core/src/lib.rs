//! Stockfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the snapshot reconciliation engine and the domain
//! types around it. It is database-agnostic and defines store traits that
//! are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod orchestrator;
pub mod portfolio;
pub mod quotes;
pub mod reference;
pub mod snapshot;
pub mod users;
pub mod watchlist;

// Re-export common types from snapshot and portfolio modules
pub use portfolio::*;
pub use snapshot::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

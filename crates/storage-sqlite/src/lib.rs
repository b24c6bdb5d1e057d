//! SQLite storage implementation for stockfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the store traits defined in
//! `stockfolio-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel
//! dependencies exist. Everything else is database-agnostic and works
//! with traits.
//!
//! # Write discipline
//!
//! Every mutation goes through a single writer actor owning one dedicated
//! connection, and every write job runs inside an immediate transaction.
//! This is what makes the snapshot upsert's lookup-then-write sequence
//! effectively atomic per `(user_id, symbol, day)` - concurrent callers
//! racing on the same key are serialized, and the later write wins.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod holdings;
pub mod reference;
pub mod snapshot;
pub mod users;
pub mod watchlist;

mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from stockfolio-core for convenience
pub use stockfolio_core::errors::{DatabaseError, Error, Result};

//! Per-user watchlists over market-wide reference data.

pub mod watchlist_model;
pub mod watchlist_service;
pub mod watchlist_traits;

pub use watchlist_model::{Watchlist, WatchlistRefreshReport};
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::WatchlistRepositoryTrait;

//! Shared constants for the core crate.

/// Decimal places kept for money values (profit/loss, percent changes).
pub const DECIMAL_PRECISION: u32 = 2;

/// Default lookback window for history queries when the caller supplies
/// no bounds.
pub const DEFAULT_HISTORY_DAYS: i64 = 7;

/// Maximum number of symbols a watchlist may hold.
pub const WATCHLIST_MAX_SYMBOLS: usize = 10;

/// How many users are reconciled concurrently during a batch run.
/// Bounded to respect external provider rate limits.
pub const DEFAULT_USER_CONCURRENCY: usize = 8;

/// How many quote fetches run concurrently within one user's run.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

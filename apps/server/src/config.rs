//! Server configuration from environment variables.

use stockfolio_core::constants::DEFAULT_USER_CONCURRENCY;

/// Hour of day (UTC) for the scheduled snapshot update when none is
/// configured.
const DEFAULT_UPDATE_HOUR_UTC: u32 = 14;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Wall-clock hour (UTC, 0-23) of the daily snapshot update.
    pub update_hour_utc: u32,
    /// How many users are reconciled concurrently per batch.
    pub user_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("STOCKFOLIO_DB_PATH")
            .unwrap_or_else(|_| "data/stockfolio.db".to_string());

        let update_hour_utc = std::env::var("STOCKFOLIO_UPDATE_HOUR_UTC")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|hour| *hour < 24)
            .unwrap_or(DEFAULT_UPDATE_HOUR_UTC);

        let user_concurrency = std::env::var("STOCKFOLIO_USER_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_USER_CONCURRENCY);

        Self {
            db_path,
            update_hour_utc,
            user_concurrency,
        }
    }
}

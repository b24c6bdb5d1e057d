//! Watchlist management and refresh.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::constants::WATCHLIST_MAX_SYMBOLS;
use crate::errors::{Result, ValidationError};
use crate::reference::{ReferenceDataService, StockReference};
use crate::Error;

use super::watchlist_model::{Watchlist, WatchlistRefreshReport};
use super::watchlist_traits::WatchlistRepositoryTrait;

/// Service for managing a user's watchlist.
pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    reference_data: Arc<ReferenceDataService>,
}

impl WatchlistService {
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        reference_data: Arc<ReferenceDataService>,
    ) -> Self {
        Self {
            repository,
            reference_data,
        }
    }

    /// The user's watchlist; an empty one when none exists yet.
    pub fn get_watchlist(&self, user_id: &str) -> Result<Watchlist> {
        Ok(self
            .repository
            .get(user_id)?
            .unwrap_or_else(|| Watchlist::empty(user_id, Utc::now())))
    }

    /// Adds a symbol to the user's watchlist.
    ///
    /// The symbol is normalized to uppercase before any check, duplicate
    /// adds are rejected, and the list is capped at
    /// [`WATCHLIST_MAX_SYMBOLS`]. Reference data for the symbol is
    /// fetched when it is seen for the first time.
    pub async fn add_symbol(&self, user_id: &str, symbol: &str) -> Result<Watchlist> {
        let symbol = normalize_symbol(symbol)?;

        let mut watchlist = self.get_watchlist(user_id)?;
        if watchlist.symbols.contains(&symbol) {
            return Err(Error::ConstraintViolation(format!(
                "{} is already in the watchlist",
                symbol
            )));
        }
        if watchlist.symbols.len() >= WATCHLIST_MAX_SYMBOLS {
            return Err(Error::ConstraintViolation(format!(
                "Watchlist cannot exceed {} symbols",
                WATCHLIST_MAX_SYMBOLS
            )));
        }

        watchlist.symbols.insert(symbol.clone());
        watchlist.updated_at = Utc::now();
        let saved = self.repository.save(&watchlist).await?;

        // Make the new symbol visible immediately. A fetch failure does
        // not undo the add; the next refresh fills the gap.
        if let Err(e) = self.reference_data.ensure_symbol(&symbol).await {
            warn!("Could not fetch reference data for {}: {}", symbol, e);
        }

        debug!("Added {} to watchlist of user {}", symbol, user_id);
        Ok(saved)
    }

    /// Removes a symbol from the user's watchlist.
    pub async fn remove_symbol(&self, user_id: &str, symbol: &str) -> Result<Watchlist> {
        let symbol = normalize_symbol(symbol)?;

        let mut watchlist = self.get_watchlist(user_id)?;
        if !watchlist.symbols.remove(&symbol) {
            return Err(Error::ConstraintViolation(format!(
                "{} is not in the watchlist",
                symbol
            )));
        }
        watchlist.updated_at = Utc::now();
        self.repository.save(&watchlist).await
    }

    /// Refreshes reference data for every symbol on the watchlist.
    ///
    /// One symbol's failure never aborts the loop; failures are recorded
    /// per symbol in the report.
    pub async fn refresh(&self, user_id: &str) -> Result<WatchlistRefreshReport> {
        let watchlist = self.get_watchlist(user_id)?;
        let mut report = WatchlistRefreshReport::default();

        for symbol in &watchlist.symbols {
            match self.reference_data.refresh_symbol(symbol).await {
                Ok(_) => {
                    report.updated.insert(symbol.clone());
                }
                Err(e) => {
                    warn!("Failed to refresh watchlist symbol {}: {}", symbol, e);
                    report.errors.insert(symbol.clone(), e.to_string());
                }
            }
        }

        Ok(report)
    }

    /// Stored reference rows for the user's watched symbols.
    pub fn watchlist_references(&self, user_id: &str) -> Result<Vec<StockReference>> {
        let watchlist = self.get_watchlist(user_id)?;
        let symbols: Vec<String> = watchlist.symbols.iter().cloned().collect();
        self.reference_data.get_references(&symbols)
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let normalized = symbol.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Symbol cannot be empty".to_string(),
        )));
    }
    Ok(normalized)
}

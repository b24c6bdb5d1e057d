//! The snapshot reconciliation engine.
//!
//! For one user, per run: check the staleness gate, fetch a quote per
//! holding, compute derived fields, and upsert the resulting daily
//! snapshots. Per-holding failures are recorded and never abort the run;
//! the next scheduled wake-up is the retry mechanism.
//!
//! ```text
//! Pending -> Checking-Staleness -> Skip-AlreadyDone
//!                               -> Fetching -> Upserting -> Done
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, error, warn};

use crate::constants::DEFAULT_FETCH_CONCURRENCY;
use crate::errors::Result;
use crate::holdings::{Holding, HoldingRepositoryTrait};
use crate::quotes::{QuoteError, QuoteGateway};

use super::gate::RefreshGate;
use super::snapshot_model::HoldingSnapshot;
use super::store::SnapshotStore;
use super::types::Day;

// =============================================================================
// Result Types
// =============================================================================

/// Why one symbol failed within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Definitive "no data" for this symbol: insufficient history or an
    /// unknown ticker. Retried naturally on the next scheduled run.
    QuoteUnavailable(String),
    /// Transient provider failure (network, timeout, rate limit). Same
    /// retry-on-next-run policy; no in-run backoff.
    Provider(String),
    /// The snapshot write failed after a successful fetch.
    Persistence(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::QuoteUnavailable(reason) => write!(f, "quote unavailable: {}", reason),
            FailureReason::Provider(message) => write!(f, "provider error: {}", message),
            FailureReason::Persistence(message) => write!(f, "persistence error: {}", message),
        }
    }
}

/// Outcome of one user's reconciliation run.
///
/// Having failed symbols is not an error condition: a run where every
/// fetch failed still completes, with an empty `updated` set.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    pub user_id: String,
    /// Symbols whose snapshot was written this run.
    pub updated: HashSet<String>,
    /// Per-symbol failures recorded during the run.
    pub failed: HashMap<String, FailureReason>,
    /// True when the staleness gate short-circuited the run.
    pub skipped: bool,
}

impl ReconciliationReport {
    fn completed(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    fn skipped(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            skipped: true,
            ..Default::default()
        }
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        if self.skipped {
            format!("User {}: already current, skipped", self.user_id)
        } else {
            format!(
                "User {}: {} snapshot(s) updated, {} failed",
                self.user_id,
                self.updated.len(),
                self.failed.len()
            )
        }
    }
}

// =============================================================================
// Reconciliation Engine
// =============================================================================

/// Per-user snapshot reconciliation.
///
/// All collaborators are injected at construction; nothing ambient is
/// read at trigger time.
pub struct ReconciliationEngine {
    holdings: Arc<dyn HoldingRepositoryTrait>,
    gateway: Arc<dyn QuoteGateway>,
    store: Arc<dyn SnapshotStore>,
    gate: Arc<dyn RefreshGate>,
    fetch_concurrency: usize,
}

impl ReconciliationEngine {
    pub fn new(
        holdings: Arc<dyn HoldingRepositoryTrait>,
        gateway: Arc<dyn QuoteGateway>,
        store: Arc<dyn SnapshotStore>,
        gate: Arc<dyn RefreshGate>,
    ) -> Self {
        Self {
            holdings,
            gateway,
            store,
            gate,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Overrides how many quote fetches run concurrently within one run.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// Reconciles one user's holdings against live quotes.
    ///
    /// `force = true` bypasses the staleness gate (manual refresh);
    /// the scheduled path always passes `false` and becomes a no-op once
    /// any snapshot exists for the current UTC day.
    pub async fn reconcile_user(&self, user_id: &str, force: bool) -> Result<ReconciliationReport> {
        let today = Day::today();
        if !force && self.gate.is_fresh(user_id, today)? {
            debug!(
                "Snapshots for user {} already current for {}; skipping",
                user_id, today
            );
            return Ok(ReconciliationReport::skipped(user_id));
        }

        let holdings = self.holdings.list_for_user(user_id)?;
        if holdings.is_empty() {
            debug!("No holdings for user {}; nothing to reconcile", user_id);
            return Ok(ReconciliationReport::completed(user_id));
        }

        debug!(
            "Reconciling {} holding(s) for user {}",
            holdings.len(),
            user_id
        );

        let outcomes: Vec<_> = stream::iter(holdings)
            .map(|holding| self.reconcile_holding(holding))
            .buffer_unordered(self.fetch_concurrency)
            .collect()
            .await;

        let mut report = ReconciliationReport::completed(user_id);
        for outcome in outcomes {
            match outcome {
                Ok(symbol) => {
                    report.updated.insert(symbol);
                }
                Err((symbol, reason)) => {
                    report.failed.insert(symbol, reason);
                }
            }
        }

        debug!("{}", report.summary());
        Ok(report)
    }

    /// Fetch, compute, and upsert one holding's snapshot.
    ///
    /// Returns the symbol on success, or the symbol with its failure
    /// reason - one holding's failure must never abort the others.
    async fn reconcile_holding(
        &self,
        holding: Holding,
    ) -> std::result::Result<String, (String, FailureReason)> {
        let symbol = holding.symbol.trim().to_uppercase();

        let quote = match self.gateway.fetch(&symbol).await {
            Ok(quote) => quote,
            Err(QuoteError::InsufficientHistory { reason, .. }) => {
                debug!("No quote data for {}: {}", symbol, reason);
                return Err((symbol, FailureReason::QuoteUnavailable(reason)));
            }
            Err(QuoteError::ProviderUnavailable(message)) => {
                warn!("Provider failure for {}: {}", symbol, message);
                return Err((symbol, FailureReason::Provider(message)));
            }
        };

        let snapshot = HoldingSnapshot::compute(&holding, &quote, Utc::now());
        match self.store.upsert_holding_snapshot(&snapshot).await {
            Ok(_) => Ok(symbol),
            Err(e) => {
                error!("Failed to store snapshot for {}: {}", symbol, e);
                Err((symbol, FailureReason::Persistence(e.to_string())))
            }
        }
    }
}

//! Batch orchestration: one reconciliation + aggregation pass over all
//! users per scheduled wake-up.

mod report;

pub use report::BatchReport;

#[cfg(test)]
mod orchestrator_tests;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, error, info};

use crate::constants::DEFAULT_USER_CONCURRENCY;
use crate::errors::Result;
use crate::portfolio::PortfolioAggregator;
use crate::snapshot::{ReconciliationEngine, ReconciliationReport};
use crate::users::UserRepositoryTrait;

/// Runs the reconciliation engine and the aggregator for every user.
///
/// Per-user work is independent and runs on a bounded worker pool; no
/// ordering is guaranteed between users. One user's unexpected failure is
/// recorded and the loop proceeds - batch-level isolation.
pub struct UpdateOrchestrator {
    users: Arc<dyn UserRepositoryTrait>,
    engine: Arc<ReconciliationEngine>,
    aggregator: Arc<PortfolioAggregator>,
    user_concurrency: usize,
}

impl UpdateOrchestrator {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        engine: Arc<ReconciliationEngine>,
        aggregator: Arc<PortfolioAggregator>,
    ) -> Self {
        Self {
            users,
            engine,
            aggregator,
            user_concurrency: DEFAULT_USER_CONCURRENCY,
        }
    }

    /// Overrides how many users are processed concurrently.
    pub fn with_user_concurrency(mut self, concurrency: usize) -> Self {
        self.user_concurrency = concurrency.max(1);
        self
    }

    /// Runs one batch over all users.
    ///
    /// Zero users is a successful no-op. Errors raised for an individual
    /// user are caught, logged with user context, and recorded in the
    /// report; they never abort the batch.
    pub async fn run_all(&self) -> Result<BatchReport> {
        let user_ids = self.users.list_user_ids()?;
        if user_ids.is_empty() {
            debug!("No users to update; batch is a no-op");
            return Ok(BatchReport::default());
        }

        info!("Starting snapshot update for {} user(s)", user_ids.len());

        let outcomes: Vec<_> = stream::iter(user_ids)
            .map(|user_id| async move {
                let outcome = self.run_user(&user_id).await;
                (user_id, outcome)
            })
            .buffer_unordered(self.user_concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (user_id, outcome) in outcomes {
            match outcome {
                Ok(user_report) => report.record(user_report),
                Err(e) => {
                    error!("Snapshot update failed for user {}: {}", user_id, e);
                    report.record_failure(user_id, e.to_string());
                }
            }
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// One user's unit of work: reconcile, then aggregate.
    ///
    /// When the staleness gate skipped the run, aggregation is skipped
    /// too - the whole per-user unit is a no-op for the day.
    async fn run_user(&self, user_id: &str) -> Result<ReconciliationReport> {
        let report = self.engine.reconcile_user(user_id, false).await?;
        if !report.skipped {
            self.aggregator.aggregate_user(user_id).await?;
        }
        Ok(report)
    }
}

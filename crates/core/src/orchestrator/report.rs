//! Batch run reporting.

use crate::snapshot::ReconciliationReport;

/// Aggregate result of one orchestrator batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Users whose run completed (including runs with failed symbols).
    pub users_processed: usize,
    /// Users skipped by the staleness gate.
    pub users_skipped: usize,
    /// Users whose run raised an unexpected error.
    pub users_failed: usize,
    /// Total snapshots written across all users.
    pub snapshots_updated: usize,
    /// Total symbols that failed across all users.
    pub symbols_failed: usize,
    /// Per-user unexpected errors as `(user_id, message)`.
    pub failures: Vec<(String, String)>,
    /// Per-user run reports, in completion order.
    pub reports: Vec<ReconciliationReport>,
}

impl BatchReport {
    /// Check if the batch ran without any per-user errors.
    pub fn is_success(&self) -> bool {
        self.users_failed == 0
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Batch complete: {} user(s) processed, {} skipped, {} failed; {} snapshot(s) updated, {} symbol(s) failed",
            self.users_processed,
            self.users_skipped,
            self.users_failed,
            self.snapshots_updated,
            self.symbols_failed
        )
    }

    pub(crate) fn record(&mut self, report: ReconciliationReport) {
        if report.skipped {
            self.users_skipped += 1;
        } else {
            self.users_processed += 1;
            self.snapshots_updated += report.updated.len();
            self.symbols_failed += report.failed.len();
        }
        self.reports.push(report);
    }

    pub(crate) fn record_failure(&mut self, user_id: String, message: String) {
        self.users_failed += 1;
        self.failures.push((user_id, message));
    }
}

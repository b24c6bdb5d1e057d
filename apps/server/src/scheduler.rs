//! Background scheduler for the daily snapshot update.
//!
//! Wakes once per day at a fixed UTC wall-clock hour and runs one
//! orchestrator batch. Overlapping triggers are safe but redundant: the
//! staleness gate and idempotent upserts make a second same-day run a
//! no-op per user.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first scheduling decision (lets the server
/// fully start).
const INITIAL_DELAY_SECS: u64 = 30;

/// Starts the daily snapshot update scheduler.
pub fn start_snapshot_scheduler(state: Arc<AppState>, hour_utc: u32) {
    tokio::spawn(async move {
        info!(
            "Snapshot scheduler started (daily at {:02}:00 UTC)",
            hour_utc
        );

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        loop {
            let wait = duration_until_next_run(Utc::now(), hour_utc);
            debug!("Next snapshot update in {}s", wait.as_secs());
            tokio::time::sleep(wait).await;

            run_scheduled_update(&state).await;
        }
    });
}

/// Runs a single scheduled update batch.
async fn run_scheduled_update(state: &Arc<AppState>) {
    info!("Running scheduled snapshot update...");

    match state.orchestrator.run_all().await {
        Ok(report) => {
            if report.is_success() {
                info!("{}", report.summary());
            } else {
                warn!("{}", report.summary());
                for (user_id, message) in &report.failures {
                    warn!("User {} failed: {}", user_id, message);
                }
            }
        }
        Err(e) => {
            error!("Scheduled snapshot update failed: {}", e);
        }
    }
}

/// Time left until the next occurrence of `hour_utc:00:00`.
fn duration_until_next_run(now: DateTime<Utc>, hour_utc: u32) -> std::time::Duration {
    let today_run = now
        .date_naive()
        .and_hms_opt(hour_utc, 0, 0)
        .unwrap_or_else(|| now.date_naive().and_hms_opt(0, 0, 0).unwrap())
        .and_utc();

    let next_run = if today_run > now {
        today_run
    } else {
        today_run + ChronoDuration::days(1)
    };

    (next_run - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let wait = duration_until_next_run(now, 14);
        assert_eq!(wait.as_secs(), 4 * 3600 + 30 * 60);
    }

    #[test]
    fn test_run_already_passed_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();
        let wait = duration_until_next_run(now, 14);
        assert_eq!(wait.as_secs(), 23 * 3600);
    }

    #[test]
    fn test_exact_hour_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        let wait = duration_until_next_run(now, 14);
        assert_eq!(wait.as_secs(), 24 * 3600);
    }
}

//! Tests for batch-level isolation in the orchestrator.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;

use crate::errors::{DatabaseError, Result};
use crate::holdings::{Holding, HoldingPatch, HoldingRepositoryTrait, NewHolding};
use crate::portfolio::PortfolioAggregator;
use crate::quotes::{Quote, QuoteError, QuoteGateway};
use crate::snapshot::testing::MemorySnapshotStore;
use crate::snapshot::{DailyUserGate, ReconciliationEngine, SnapshotStore};
use crate::users::UserRepositoryTrait;
use crate::Error;

use super::UpdateOrchestrator;

// =========================================================================
// Mocks
// =========================================================================

struct FixedUsers(Vec<String>);

impl UserRepositoryTrait for FixedUsers {
    fn list_user_ids(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Holdings repository that errors for selected users, to simulate a
/// store becoming unavailable mid-run.
#[derive(Default)]
struct FaultyHoldingRepository {
    holdings: Mutex<Vec<Holding>>,
    failing_users: Mutex<HashSet<String>>,
}

impl FaultyHoldingRepository {
    fn add_holding(&self, holding: Holding) {
        self.holdings.lock().unwrap().push(holding);
    }

    fn fail_for(&self, user_id: &str) {
        self.failing_users.lock().unwrap().insert(user_id.to_string());
    }
}

#[async_trait]
impl HoldingRepositoryTrait for FaultyHoldingRepository {
    async fn create(&self, _new_holding: NewHolding) -> Result<Holding> {
        unimplemented!("not used by orchestrator tests")
    }

    async fn update(
        &self,
        _holding_id: &str,
        _user_id: &str,
        _patch: HoldingPatch,
    ) -> Result<Holding> {
        unimplemented!("not used by orchestrator tests")
    }

    async fn delete(&self, _holding_id: &str, _user_id: &str) -> Result<usize> {
        unimplemented!("not used by orchestrator tests")
    }

    fn get_by_id(&self, holding_id: &str, _user_id: &str) -> Result<Holding> {
        Err(Error::Database(DatabaseError::NotFound(
            holding_id.to_string(),
        )))
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Holding>> {
        if self.failing_users.lock().unwrap().contains(user_id) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "database is locked".to_string(),
            )));
        }
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }
}

struct FixedPriceGateway;

#[async_trait]
impl QuoteGateway for FixedPriceGateway {
    async fn fetch(&self, symbol: &str) -> std::result::Result<Quote, QuoteError> {
        Ok(Quote {
            symbol: symbol.to_string(),
            price: dec!(110),
            previous_close: dec!(100),
            day_high: None,
            day_low: None,
            volume: None,
            company_name: None,
            fetched_at: Utc::now(),
        })
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn holding(user_id: &str, symbol: &str) -> Holding {
    let now = Utc::now();
    Holding {
        id: format!("{}-{}", user_id, symbol),
        user_id: user_id.to_string(),
        symbol: symbol.to_string(),
        name: format!("{} Corp", symbol),
        purchase_price: dec!(100),
        quantity: dec!(10),
        purchase_date: now,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

struct Fixture {
    orchestrator: UpdateOrchestrator,
    store: Arc<MemorySnapshotStore>,
    repository: Arc<FaultyHoldingRepository>,
}

fn fixture(user_ids: &[&str]) -> Fixture {
    let store = Arc::new(MemorySnapshotStore::new());
    let repository = Arc::new(FaultyHoldingRepository::default());
    let store_dyn: Arc<dyn SnapshotStore> = store.clone();
    let gate = Arc::new(DailyUserGate::new(store_dyn));
    let engine = Arc::new(ReconciliationEngine::new(
        repository.clone(),
        Arc::new(FixedPriceGateway),
        store.clone(),
        gate,
    ));
    let aggregator = Arc::new(PortfolioAggregator::new(store.clone()));
    let users = Arc::new(FixedUsers(
        user_ids.iter().map(|id| id.to_string()).collect(),
    ));
    let orchestrator = UpdateOrchestrator::new(users, engine, aggregator);
    Fixture {
        orchestrator,
        store,
        repository,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_batch_processes_all_users() {
    let fx = fixture(&["u1", "u2"]);
    fx.repository.add_holding(holding("u1", "AAPL"));
    fx.repository.add_holding(holding("u2", "MSFT"));

    let report = fx.orchestrator.run_all().await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.users_processed, 2);
    assert_eq!(report.snapshots_updated, 2);
    assert_eq!(fx.store.holding_snapshots().len(), 2);
    // One portfolio rollup per processed user.
    assert_eq!(fx.store.portfolio_snapshots().len(), 2);
}

#[tokio::test]
async fn test_one_users_error_does_not_abort_the_batch() {
    let fx = fixture(&["u1", "u2"]);
    fx.repository.add_holding(holding("u1", "AAPL"));
    fx.repository.add_holding(holding("u2", "MSFT"));
    fx.repository.fail_for("u1");

    let report = fx.orchestrator.run_all().await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.users_failed, 1);
    assert_eq!(report.failures[0].0, "u1");
    // U2 was still processed and reported.
    assert_eq!(report.users_processed, 1);
    let snapshots = fx.store.holding_snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].user_id, "u2");
}

#[tokio::test]
async fn test_zero_users_is_a_noop() {
    let fx = fixture(&[]);

    let report = fx.orchestrator.run_all().await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.users_processed, 0);
    assert!(report.reports.is_empty());
}

#[tokio::test]
async fn test_overlapping_batches_stay_idempotent() {
    let fx = fixture(&["u1"]);
    fx.repository.add_holding(holding("u1", "AAPL"));

    let first = fx.orchestrator.run_all().await.unwrap();
    assert_eq!(first.users_processed, 1);

    // A redundant same-day trigger: gate makes the user a no-op, and no
    // extra rollup row is appended.
    let second = fx.orchestrator.run_all().await.unwrap();
    assert_eq!(second.users_skipped, 1);
    assert_eq!(second.users_processed, 0);
    assert_eq!(fx.store.holding_snapshots().len(), 1);
    assert_eq!(fx.store.portfolio_snapshots().len(), 1);
}

#[tokio::test]
async fn test_user_without_holdings_completes_without_rollup() {
    let fx = fixture(&["u1"]);

    let report = fx.orchestrator.run_all().await.unwrap();

    assert_eq!(report.users_processed, 1);
    assert!(fx.store.portfolio_snapshots().is_empty());
}

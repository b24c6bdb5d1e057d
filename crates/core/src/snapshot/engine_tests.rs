//! Tests for the reconciliation engine contracts: idempotence,
//! partial-failure isolation, and the staleness gate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::{DatabaseError, Result};
use crate::holdings::{Holding, HoldingPatch, HoldingRepositoryTrait, NewHolding};
use crate::quotes::{Quote, QuoteError, QuoteGateway};
use crate::Error;

use super::engine::{FailureReason, ReconciliationEngine};
use super::gate::DailyUserGate;
use super::store::SnapshotStore;
use super::testing::MemorySnapshotStore;

// =========================================================================
// Mock holdings repository
// =========================================================================

#[derive(Default)]
struct MockHoldingRepository {
    holdings: Mutex<Vec<Holding>>,
}

impl MockHoldingRepository {
    fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            holdings: Mutex::new(holdings),
        }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for MockHoldingRepository {
    async fn create(&self, _new_holding: NewHolding) -> Result<Holding> {
        unimplemented!("not used by engine tests")
    }

    async fn update(
        &self,
        _holding_id: &str,
        _user_id: &str,
        _patch: HoldingPatch,
    ) -> Result<Holding> {
        unimplemented!("not used by engine tests")
    }

    async fn delete(&self, _holding_id: &str, _user_id: &str) -> Result<usize> {
        unimplemented!("not used by engine tests")
    }

    fn get_by_id(&self, holding_id: &str, user_id: &str) -> Result<Holding> {
        self.holdings
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id == holding_id && h.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(holding_id.to_string())))
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Holding>> {
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

// =========================================================================
// Mock quote gateway
// =========================================================================

#[derive(Default)]
struct MockQuoteGateway {
    prices: Mutex<HashMap<String, (Decimal, Decimal)>>,
    failures: Mutex<HashMap<String, QuoteError>>,
    requests: Mutex<Vec<String>>,
}

impl MockQuoteGateway {
    fn set_price(&self, symbol: &str, price: Decimal, previous_close: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), (price, previous_close));
    }

    fn set_failure(&self, symbol: &str, error: QuoteError) {
        self.failures
            .lock()
            .unwrap()
            .insert(symbol.to_string(), error);
    }

    fn requested_symbols(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteGateway for MockQuoteGateway {
    async fn fetch(&self, symbol: &str) -> std::result::Result<Quote, QuoteError> {
        self.requests.lock().unwrap().push(symbol.to_string());

        if let Some(error) = self.failures.lock().unwrap().get(symbol) {
            return Err(error.clone());
        }
        let (price, previous_close) = self
            .prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or((dec!(100), dec!(100)));
        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            previous_close,
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
    engine: ReconciliationEngine,
    store: Arc<MemorySnapshotStore>,
    gateway: Arc<MockQuoteGateway>,
}

fn fixture(holdings: Vec<Holding>) -> Fixture {
    let store = Arc::new(MemorySnapshotStore::new());
    let gateway = Arc::new(MockQuoteGateway::default());
    let repository = Arc::new(MockHoldingRepository::with_holdings(holdings));
    let store_dyn: Arc<dyn SnapshotStore> = store.clone();
    let gate = Arc::new(DailyUserGate::new(store_dyn));
    let engine = ReconciliationEngine::new(repository, gateway.clone(), store.clone(), gate);
    Fixture {
        engine,
        store,
        gateway,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_run_writes_one_snapshot_per_holding() {
    let fx = fixture(vec![holding("u1", "AAPL"), holding("u1", "MSFT")]);
    fx.gateway.set_price("AAPL", dec!(120), dec!(110));
    fx.gateway.set_price("MSFT", dec!(310), dec!(300));

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(!report.skipped);
    assert_eq!(report.updated.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(fx.store.holding_snapshots().len(), 2);
}

#[tokio::test]
async fn test_second_run_same_day_is_a_noop() {
    let fx = fixture(vec![holding("u1", "AAPL")]);

    let first = fx.engine.reconcile_user("u1", false).await.unwrap();
    assert_eq!(first.updated.len(), 1);

    let second = fx.engine.reconcile_user("u1", false).await.unwrap();
    assert!(second.skipped);
    assert!(second.updated.is_empty());

    // Still one row per symbol.
    assert_eq!(fx.store.holding_snapshots().len(), 1);
    // The gate short-circuits before any fetch.
    assert_eq!(fx.gateway.requested_symbols().len(), 1);
}

#[tokio::test]
async fn test_force_bypasses_gate_without_duplicating_rows() {
    let fx = fixture(vec![holding("u1", "AAPL")]);
    fx.gateway.set_price("AAPL", dec!(120), dec!(110));
    fx.engine.reconcile_user("u1", false).await.unwrap();

    fx.gateway.set_price("AAPL", dec!(125), dec!(110));
    let forced = fx.engine.reconcile_user("u1", true).await.unwrap();

    assert!(!forced.skipped);
    assert_eq!(forced.updated.len(), 1);

    // Same-day upsert replaced the row; the later write's values win.
    let rows = fx.store.holding_snapshots();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].live_price, dec!(125));
}

#[tokio::test]
async fn test_one_failing_symbol_does_not_abort_the_others() {
    let fx = fixture(vec![
        holding("u1", "AAPL"),
        holding("u1", "FAIL"),
        holding("u1", "MSFT"),
    ]);
    fx.gateway
        .set_failure("FAIL", QuoteError::ProviderUnavailable("timeout".to_string()));

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert_eq!(report.updated.len(), 2);
    assert!(report.updated.contains("AAPL"));
    assert!(report.updated.contains("MSFT"));
    assert!(matches!(
        report.failed.get("FAIL"),
        Some(FailureReason::Provider(_))
    ));
    assert_eq!(fx.store.holding_snapshots().len(), 2);
}

#[tokio::test]
async fn test_insufficient_history_recorded_as_quote_unavailable() {
    let fx = fixture(vec![holding("u1", "NEWIPO")]);
    fx.gateway.set_failure(
        "NEWIPO",
        QuoteError::InsufficientHistory {
            symbol: "NEWIPO".to_string(),
            reason: "fewer than two sessions".to_string(),
        },
    );

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(report.updated.is_empty());
    assert!(matches!(
        report.failed.get("NEWIPO"),
        Some(FailureReason::QuoteUnavailable(_))
    ));
}

#[tokio::test]
async fn test_total_fetch_failure_still_completes_the_run() {
    let fx = fixture(vec![holding("u1", "AAPL"), holding("u1", "MSFT")]);
    fx.gateway
        .set_failure("AAPL", QuoteError::ProviderUnavailable("down".to_string()));
    fx.gateway
        .set_failure("MSFT", QuoteError::ProviderUnavailable("down".to_string()));

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(!report.skipped);
    assert!(report.updated.is_empty());
    assert_eq!(report.failed.len(), 2);
}

#[tokio::test]
async fn test_store_failure_recorded_per_symbol() {
    let fx = fixture(vec![holding("u1", "AAPL")]);
    fx.store.set_fail_on_write(true);

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(report.updated.is_empty());
    assert!(matches!(
        report.failed.get("AAPL"),
        Some(FailureReason::Persistence(_))
    ));
}

#[tokio::test]
async fn test_symbols_are_uppercased_before_dispatch() {
    let fx = fixture(vec![holding("u1", "aapl")]);

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(report.updated.contains("AAPL"));
    assert_eq!(fx.gateway.requested_symbols(), vec!["AAPL".to_string()]);
    assert_eq!(fx.store.holding_snapshots()[0].symbol, "AAPL");
}

#[tokio::test]
async fn test_user_without_holdings_completes_empty() {
    let fx = fixture(vec![]);

    let report = fx.engine.reconcile_user("u1", false).await.unwrap();

    assert!(!report.skipped);
    assert!(report.updated.is_empty());
    assert!(report.failed.is_empty());
    assert!(fx.store.holding_snapshots().is_empty());
}

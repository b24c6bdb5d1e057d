//! Application state construction and tracing setup.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use stockfolio_core::orchestrator::UpdateOrchestrator;
use stockfolio_core::portfolio::PortfolioAggregator;
use stockfolio_core::quotes::{ProviderQuoteGateway, QuoteGateway};
use stockfolio_core::snapshot::{DailyUserGate, ReconciliationEngine, SnapshotStore};
use stockfolio_market_data::YahooProvider;
use stockfolio_storage_sqlite::holdings::HoldingRepository;
use stockfolio_storage_sqlite::snapshot::SnapshotRepository;
use stockfolio_storage_sqlite::users::UserRepository;
use stockfolio_storage_sqlite::{create_pool, init, run_migrations, spawn_writer};

use crate::config::Config;

pub struct AppState {
    pub orchestrator: Arc<UpdateOrchestrator>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("STOCKFOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Wires pool, writer, repositories, gateway and services into the
/// orchestrator. Everything is injected here at construction time; no
/// ambient globals are read when the trigger later fires.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone()));

    let provider = Arc::new(YahooProvider::new()?);
    let gateway: Arc<dyn QuoteGateway> = Arc::new(ProviderQuoteGateway::new(provider));

    let snapshot_store: Arc<dyn SnapshotStore> = snapshot_repository;
    let gate = Arc::new(DailyUserGate::new(snapshot_store.clone()));
    let engine = Arc::new(ReconciliationEngine::new(
        holding_repository,
        gateway,
        snapshot_store.clone(),
        gate,
    ));
    let aggregator = Arc::new(PortfolioAggregator::new(snapshot_store));
    let orchestrator = Arc::new(
        UpdateOrchestrator::new(user_repository, engine, aggregator)
            .with_user_concurrency(config.user_concurrency),
    );

    Ok(Arc::new(AppState {
        orchestrator,
        db_path,
    }))
}

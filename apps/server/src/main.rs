mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();

    let state = build_state(&config).await?;

    // Daily snapshot update at the configured UTC hour
    scheduler::start_snapshot_scheduler(state.clone(), config.update_hour_utc);

    tracing::info!("stockfolio server running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}

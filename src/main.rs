mod bootstrap;
mod chain;
mod config;
mod contract;
mod error;
mod modules;
mod scheduler;

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,ica_coordinator=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("🚀 Starting ICA custody coordinator");

    let config = config::Config::from_env().context("loading configuration")?;

    let mut scheduler = bootstrap::initialize_scheduler(&config)?;
    scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("Shutdown requested, waiting for in-flight ticks ...");
    scheduler.stop().await;

    Ok(())
}

//! Warlock client binary.
//!
//! Composition root that assembles:
//! 1. Configuration from the environment (and an optional `.env` file)
//! 2. Logging via `tracing-subscriber`
//! 3. The runtime with the wander autopilot as input
//!
//! # Examples
//!
//! ```bash
//! # one minute of autopilot with a fixed seed
//! WARLOCK_SEED=7 WARLOCK_RUN_SECONDS=60 cargo run -p warlock-client
//!
//! # custom config file, verbose core logs
//! WARLOCK_CONFIG=crates/game/content/data/config.toml RUST_LOG=game_core=debug cargo run -p warlock-client
//! ```

use anyhow::Result;
use warlock_client::{Client, ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    logging::setup_logging()?;

    tracing::info!("Starting warlock client");
    tracing::info!("Seed override: {:?}", config.seed);
    tracing::info!("Session length: {:?}", config.run_for);

    let client = Client::builder().config(config).build()?;

    tracing::info!("Client assembled, starting...");
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

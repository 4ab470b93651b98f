//! Tracing subscriber setup for the headless client.
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs an stderr fmt layer filtered by `RUST_LOG`, INFO by default.
pub fn setup_logging() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

//! Client builder: resolves configuration and assembles the runtime.

use anyhow::{Context, Result};
use tracing::{debug, info};

use game_content::ConfigLoader;
use runtime::{Runtime, RuntimeConfig, WanderInputProvider};

use crate::config::ClientConfig;
use crate::readout::{MessageLog, Readout};
use crate::Client;

/// Builder for constructing a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the game config, then builds and starts the runtime.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Client> {
        let config = self.config;

        let mut game_config = ConfigLoader::load_or_default(config.config_path.as_deref())?;
        if let Some(seed) = config.seed {
            game_config.seed = seed;
        }
        debug!(?game_config, "game configuration resolved");

        let runtime_config = RuntimeConfig {
            game_config: game_config.clone(),
            frame_interval: config.frame_interval,
            ..RuntimeConfig::default()
        };
        let runtime = Runtime::builder()
            .config(runtime_config)
            .input_provider(WanderInputProvider::new(
                game_config.seed ^ 0x5eed,
                config.input_chance,
            ))
            .build()
            .context("failed to start the runtime")?;

        info!(
            seed = game_config.seed,
            width = game_config.grid_width,
            height = game_config.grid_height,
            "runtime started"
        );

        Ok(Client {
            runtime,
            readout: Readout::new(MessageLog::new(config.messages.capacity)),
            run_for: config.run_for,
        })
    }
}

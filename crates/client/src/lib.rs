//! Headless client for the warlock dungeon simulation.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (simulation worker, event bus, autopilot input)
//!   └─→ Readout (text log of presentation events)
//! ```
//!
//! The client is the composition root: it reads the environment, loads the
//! game config, starts the runtime and logs what happens until the session
//! ends.

mod builder;
pub mod config;
pub mod logging;
pub mod readout;

pub use builder::ClientBuilder;
pub use config::{ClientConfig, MessageConfig};
pub use readout::{MessageEntry, MessageLevel, MessageLog, Readout};

use std::time::Duration;

use anyhow::Result;
use runtime::{Runtime, Topic};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Top-level client container.
pub struct Client {
    runtime: Runtime,
    readout: Readout,
    run_for: Option<Duration>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    /// Drives the runtime until the session length elapses, Ctrl-C arrives
    /// or the runtime fails, then shuts it down and logs the last messages.
    pub async fn run(mut self) -> Result<()> {
        let mut events = self
            .runtime
            .handle()
            .subscribe_multiple(&[Topic::Game, Topic::Lifecycle]);
        let (Some(mut game), Some(mut lifecycle)) =
            (events.remove(&Topic::Game), events.remove(&Topic::Lifecycle))
        else {
            anyhow::bail!("event bus did not provide the readout topics");
        };

        let run_for = self.run_for;
        let deadline = async move {
            match run_for {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        let outcome = {
            let driver = self.runtime.run();
            tokio::pin!(driver);
            loop {
                tokio::select! {
                    result = &mut driver => break result.map_err(anyhow::Error::from),
                    _ = &mut deadline => {
                        info!("session length reached");
                        break Ok(());
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupted");
                        break Ok(());
                    }
                    event = game.recv() => consume(&mut self.readout, event),
                    event = lifecycle.recv() => consume(&mut self.readout, event),
                }
            }
        };

        self.runtime.shutdown().await?;

        info!("last messages:");
        for entry in self.readout.log().iter() {
            info!("  {}", entry.text);
        }
        outcome
    }
}

fn consume(
    readout: &mut Readout,
    event: std::result::Result<runtime::Event, broadcast::error::RecvError>,
) {
    match event {
        Ok(event) => {
            readout.consume(&event);
        }
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            warn!(skipped, "readout fell behind");
        }
        Err(broadcast::error::RecvError::Closed) => {}
    }
}

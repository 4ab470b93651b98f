//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use game_core::{GameConfig, GameEngine, GameError};

use crate::api::{InputProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker, WorkerSettings};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Wall-clock length of one frame.
    pub frame_interval: Duration,
    /// Frames between the warlock's death and the automatic reset.
    pub reset_delay_frames: u32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            frame_interval: Duration::from_millis(16),
            reset_delay_frames: 120,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates the simulation
///
/// Design: Runtime owns the worker and polls the input provider.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    frame_interval: Duration,
    input_provider: Option<Box<dyn InputProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Set the input provider polled by [`Self::step`]
    pub fn set_input_provider(&mut self, provider: impl InputProvider + 'static) {
        self.input_provider = Some(Box::new(provider));
    }

    /// Ask the input provider once, if the tick gate is open.
    ///
    /// Returns whether an input was accepted. Refused inputs (the gate closed
    /// in between, or an ability declined) are not errors here.
    pub async fn step(&self) -> Result<bool> {
        let Some(provider) = self.input_provider.as_ref() else {
            return Ok(false);
        };
        let snapshot = self.handle.query_snapshot().await?;
        if !snapshot.can_tick {
            return Ok(false);
        }
        let Some(input) = provider.next_input(&snapshot).await? else {
            return Ok(false);
        };
        match self.handle.submit_input(input).await {
            Ok(()) => Ok(true),
            Err(RuntimeError::InputRefused(reason)) => {
                debug!(?input, code = reason.error_code(), "input refused");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Poll the input provider once per frame until the worker stops.
    pub async fn run(&self) -> Result<()> {
        let mut frames = tokio::time::interval(self.frame_interval.max(Duration::from_millis(1)));
        loop {
            frames.tick().await;
            self.step().await?;
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        // the worker may already be gone after a handle-initiated shutdown
        if let Err(err) = self.handle.shutdown().await {
            debug!(%err, "shutdown command not delivered (worker already stopped)");
        }
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    engine: Option<GameEngine>,
    input_provider: Option<Box<dyn InputProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            engine: None,
            input_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Run a prepared engine instead of generating a level from the config.
    pub fn engine(mut self, engine: GameEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the input provider (optional)
    pub fn input_provider(mut self, provider: impl InputProvider + 'static) -> Self {
        self.input_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker. Must run inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => {
                let mut engine = GameEngine::new(self.config.game_config.clone())?;
                engine.generate();
                engine
            }
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            engine,
            command_rx,
            event_bus,
            WorkerSettings {
                frame_interval: self.config.frame_interval,
                reset_delay_frames: self.config.reset_delay_frames,
            },
        );
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            frame_interval: self.config.frame_interval,
            input_provider: self.input_provider,
            sim_worker_handle,
        })
    }
}

//! Simulation worker that owns the authoritative [`game_core::GameEngine`].
//!
//! Runs one engine frame per interval, applies commands from
//! [`crate::RuntimeHandle`] between frames, and publishes everything the
//! engine emits to the EventBus. After the warlock dies it counts down the
//! configured delay and resets the game.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use game_core::{GameEngine, GameEvent, GameSnapshot, InputError, PlayerInput};

use crate::events::{ClockEvent, Event, EventBus, LifecycleEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Apply a player action and start a tick.
    Submit {
        input: PlayerInput,
        reply: oneshot::Sender<Result<(), InputError>>,
    },
    /// Query the current simulation state (read-only).
    QuerySnapshot { reply: oneshot::Sender<GameSnapshot> },
    /// Clear progression and generate a new level.
    Reset { reply: oneshot::Sender<()> },
    /// Stop the frame loop.
    Shutdown,
}

/// Pacing knobs the worker needs from the runtime configuration.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    pub frame_interval: Duration,
    pub reset_delay_frames: u32,
}

/// Background task that drives the frame loop.
pub struct SimulationWorker {
    engine: GameEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    settings: WorkerSettings,
    /// Frames left before the scheduled reset.
    reset_in: Option<u32>,
}

impl SimulationWorker {
    /// Creates a worker around an engine that already holds a level.
    pub fn new(
        engine: GameEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        settings: WorkerSettings,
    ) -> Self {
        info!(
            entities = engine.world().entities().count(),
            rooms = engine.world().rooms().len(),
            "SimulationWorker initialized"
        );
        Self {
            engine,
            command_rx,
            event_bus,
            settings,
            reset_in: None,
        }
    }

    /// Main worker loop. Ends on [`Command::Shutdown`] or once every handle
    /// is dropped.
    pub async fn run(mut self) {
        // level generation happened before the worker existed
        self.publish_engine_events();

        let period = self.settings.frame_interval.max(Duration::from_millis(1));
        let mut frames = tokio::time::interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = frames.tick() => self.frame(),
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
            }
        }

        info!(tick = %self.engine.clock().tick().0, "SimulationWorker stopped");
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::Stopped));
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { input, reply } => {
                let result = self.submit(input);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::Reset { reply } => {
                self.reset();
                if reply.send(()).is_err() {
                    debug!("Reset reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn submit(&mut self, input: PlayerInput) -> Result<(), InputError> {
        self.engine.submit(input)?;
        // input lands at the start of a frame, before the update pass
        self.engine.update_all();
        let tick = self.engine.clock().tick();
        debug!(?input, tick = tick.0, "tick started");
        self.event_bus
            .publish(Event::Clock(ClockEvent::TickStarted { tick }));
        self.publish_engine_events();
        Ok(())
    }

    fn frame(&mut self) {
        let was_open = self.engine.can_tick();
        self.engine.frame();
        self.publish_engine_events();

        if !was_open && self.engine.can_tick() {
            self.event_bus.publish(Event::Clock(ClockEvent::TickReady {
                tick: self.engine.clock().tick(),
            }));
        }

        match self.reset_in {
            Some(0) => self.reset(),
            Some(frames) => self.reset_in = Some(frames - 1),
            None => {}
        }
    }

    fn reset(&mut self) {
        self.reset_in = None;
        self.engine.reset();
        info!("game reset");
        self.event_bus.publish(Event::Lifecycle(LifecycleEvent::Reset));
        self.publish_engine_events();
    }

    fn publish_engine_events(&mut self) {
        let tick = self.engine.clock().tick();
        for event in self.engine.drain_events() {
            match event {
                GameEvent::LevelGenerated { rooms, inhabitants } => {
                    self.event_bus
                        .publish(Event::Lifecycle(LifecycleEvent::LevelStarted {
                            rooms,
                            inhabitants,
                        }));
                }
                GameEvent::PlayerDestroyed { .. } => {
                    let delay_frames = self.settings.reset_delay_frames;
                    info!(tick = tick.0, delay_frames, "warlock destroyed");
                    self.reset_in = Some(delay_frames);
                    self.event_bus.publish(Event::Game { tick, event });
                    self.event_bus
                        .publish(Event::Lifecycle(LifecycleEvent::ResetScheduled {
                            tick,
                            delay_frames,
                        }));
                }
                event => self.event_bus.publish(Event::Game { tick, event }),
            }
        }
    }
}

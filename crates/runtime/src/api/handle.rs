//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding input to the simulation or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{GameSnapshot, PlayerInput};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit a player action. Refused while a tick is running, the clock
    /// is frozen or the warlock is dead.
    pub async fn submit_input(&self, input: PlayerInput) -> Result<()> {
        self.request(|reply| Command::Submit { input, reply })
            .await?
            .map_err(RuntimeError::from)
    }

    /// Query the current simulation state (read-only snapshot)
    pub async fn query_snapshot(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Clear progression and generate a new level right away.
    pub async fn reset(&self) -> Result<()> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Ask the worker to stop after the current frame.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Game` - combat, magic, level-up and ability events
    /// - `Topic::Clock` - tick started / tick gate reopened
    /// - `Topic::Lifecycle` - level start, death and reset
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

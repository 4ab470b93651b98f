//! Event types for the runtime-owned topics.

use serde::{Deserialize, Serialize};

use game_core::Tick;

/// Tick gate changes, for hosts that only poll for input when it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A tick was requested and its update pass ran.
    TickStarted { tick: Tick },
    /// The gate reopened; the next input will be accepted.
    TickReady { tick: Tick },
}

/// Level and session lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// A level was generated and the simulation is running on it.
    LevelStarted { rooms: usize, inhabitants: usize },
    /// The warlock died; a reset follows after `delay_frames` frames.
    ResetScheduled { tick: Tick, delay_frames: u32 },
    /// Progression was cleared and a fresh level generated.
    Reset,
    /// The worker stopped processing frames.
    Stopped,
}

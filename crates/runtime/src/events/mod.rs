//! Topic-based event bus for runtime events.
//!
//! Simulation output is published to a topic, and consumers subscribe only
//! to the topics they render.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ClockEvent, LifecycleEvent};

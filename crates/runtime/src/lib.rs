//! Runtime orchestration for the tick-quantized dungeon simulation.
//!
//! This crate wires together the input provider abstraction, the event bus
//! and the simulation worker into a cohesive runtime API. Consumers embed
//! [`Runtime`] to pace frames, subscribe to events, and feed player input
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    IdleInputProvider, InputProvider, Result, RuntimeError, RuntimeHandle, ScriptedInputProvider,
    WanderInputProvider,
};
pub use events::{ClockEvent, Event, EventBus, LifecycleEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};

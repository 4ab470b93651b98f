//! Plain value types shared by every layer of the simulation.
//!
//! The authoritative world lives in [`crate::engine::World`]; this module only
//! holds coordinates, identifiers and the read-only [`GameSnapshot`] handed to
//! hosts.
pub mod common;
pub mod snapshot;

pub use common::{Direction, EntityId, Position, Tick};
pub use snapshot::{EntitySnapshot, GameSnapshot};

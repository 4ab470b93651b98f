//! Deterministic dungeon simulation shared by every host.
//!
//! `game-core` owns the rules: procedural level generation, the tick-quantized
//! entity state machine, collision, combat and the magic progression. It has
//! no I/O. Hosts drive a [`GameEngine`] frame by frame and render the
//! [`GameEvent`]s and [`GameSnapshot`]s it hands back.
pub mod ability;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod grid;
pub mod rng;
pub mod state;

pub use ability::{Ability, AbilityKind, LevelUp, MagicLevel, Progression};
pub use clock::Clock;
pub use collision::{Blocker, BlockerFilter, CollisionView, Occupant};
pub use combat::{AttackProfile, CritKind, CritRolls, DamageResult};
pub use config::{ConfigError, GameConfig, GenerationConfig};
pub use dungeon::{DungeonGenerator, Room, RoomCategory};
pub use engine::{GameEngine, InputError, PlayerInput, World};
pub use entity::{
    Allegiance, Behavior, DamageKinds, DestroyOutcome, Entity, EntityKind, EntityState, Motion,
};
pub use error::{ErrorSeverity, GameError};
pub use event::GameEvent;
pub use grid::{Adjacency, Grid, TileKind};
pub use rng::GameRng;
pub use state::{Direction, EntityId, EntitySnapshot, GameSnapshot, Position, Tick};

//! Presentation events emitted by the simulation.
//!
//! The core never talks to a HUD. It pushes [`GameEvent`]s into an outbox
//! that the host drains after each frame and routes to whatever renders
//! them.

use crate::ability::{AbilityKind, MagicLevel};
use crate::combat::DamageResult;
use crate::entity::EntityKind;
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A new level was generated.
    LevelGenerated { rooms: usize, inhabitants: usize },
    /// One combat resolution that should be shown.
    Damage {
        attacker: EntityId,
        defender: EntityId,
        position: Position,
        result: DamageResult,
    },
    /// Magic moved from a corpse into the warlock.
    MagicGained {
        amount: f64,
        position: Position,
        harvester: EntityKind,
    },
    LevelUp {
        level: MagicLevel,
        ability: AbilityKind,
        max_health: f64,
    },
    Healed { amount: f64, position: Position },
    AbilityUsed {
        ability: AbilityKind,
        remaining_magic: f64,
    },
    EntityDestroyed {
        id: EntityId,
        kind: EntityKind,
        position: Position,
    },
    /// The warlock died; the host schedules a reset.
    PlayerDestroyed { position: Position },
    /// The eraser removed every other entity.
    WorldErased { destroyed: usize },
}

impl GameEvent {
    /// Stable snake_case name, used as a log field.
    pub const fn name(&self) -> &'static str {
        match self {
            GameEvent::LevelGenerated { .. } => "level_generated",
            GameEvent::Damage { .. } => "damage",
            GameEvent::MagicGained { .. } => "magic_gained",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::Healed { .. } => "healed",
            GameEvent::AbilityUsed { .. } => "ability_used",
            GameEvent::EntityDestroyed { .. } => "entity_destroyed",
            GameEvent::PlayerDestroyed { .. } => "player_destroyed",
            GameEvent::WorldErased { .. } => "world_erased",
        }
    }
}

use crate::ability::{AbilityKind, MagicLevel};
use crate::entity::{EntityKind, EntityState};

use super::{Direction, EntityId, Position, Tick};

/// Read-only view of a single entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub direction: Direction,
    pub state: EntityState,
    pub health: f64,
    pub max_health: f64,
}

/// Read-only view of the whole simulation, cloned out for hosts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub tick: Tick,
    pub grid_width: u32,
    pub grid_height: u32,
    pub room_count: usize,
    pub can_tick: bool,
    /// Presentation-only interpolation fraction in `[0, 1]`.
    pub sub_tick_percent: f64,
    pub level: MagicLevel,
    pub magic: f64,
    pub abilities: Vec<AbilityKind>,
    pub entities: Vec<EntitySnapshot>,
}

impl GameSnapshot {
    pub fn player(&self) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|entity| entity.id.is_player())
    }

    pub fn living(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities
            .iter()
            .filter(|entity| entity.state != EntityState::Dead)
    }
}

//! Per-kind hooks over the shared entity state machine.

use crate::ability::MagicLevel;
use crate::collision::{BlockerFilter, CollisionView};
use crate::config::GameConfig;
use crate::grid::Grid;
use crate::rng::GameRng;
use crate::state::{Direction, EntityId, Position};

use super::dark_hand::DarkHand;
use super::profile::{Allegiance, EntityKind};
use super::DestroyOutcome;

/// Fire damage a fireball gains every tick it stays alive.
pub const FIREBALL_DAMAGE_RAMP: f64 = 2.0;

const FLOWER_STAY_CHANCE: f64 = 0.9;
const MUSHROOM_STAY_CHANCE: f64 = 0.2;
const MUSHROOM_WANDER_CHANCE: f64 = 0.3;
const FROG_STAY_CHANCE: f64 = 0.5;

/// Kind tag plus the state that kind needs between ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    Warlock,
    Mushroom,
    Flower,
    Frog { provoked: bool },
    Fireball { heading: Direction },
    DarkHand(DarkHand),
}

/// Reaction to a candidate step that hits an unwalkable tile or a friendly entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileResponse {
    Retry(Direction),
    Cancel,
    SelfDestruct,
}

/// Reaction to a candidate step that hits a hostile entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostileResponse {
    Attack,
    Retry(Direction),
    SelfDestruct,
}

/// Work requested by a new-tick hook, applied by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEffect {
    /// Fight the entity with this entity's attack profile.
    Strike(EntityId),
    /// Move the corpse's magic into the warlock and remove it.
    Harvest(EntityId),
    SelfDestruct,
}

/// Axis-dominant single step from `from` towards `to`.
pub fn step_towards(from: Position, to: Position) -> Direction {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        if dx < 0 { Direction::Left } else { Direction::Right }
    } else if dy < 0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

impl Behavior {
    pub fn for_kind(kind: EntityKind, position: Position, direction: Direction) -> Self {
        match kind {
            EntityKind::Warlock => Behavior::Warlock,
            EntityKind::Mushroom => Behavior::Mushroom,
            EntityKind::Flower => Behavior::Flower,
            EntityKind::Frog => Behavior::Frog { provoked: false },
            EntityKind::Fireball => Behavior::Fireball { heading: direction },
            EntityKind::DarkHand => Behavior::DarkHand(DarkHand::new(position, direction)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Behavior::Warlock => EntityKind::Warlock,
            Behavior::Mushroom => EntityKind::Mushroom,
            Behavior::Flower => EntityKind::Flower,
            Behavior::Frog { .. } => EntityKind::Frog,
            Behavior::Fireball { .. } => EntityKind::Fireball,
            Behavior::DarkHand(_) => EntityKind::DarkHand,
        }
    }

    fn chase(id: EntityId, position: Position, view: &CollisionView) -> Option<Direction> {
        view.nearest(EntityKind::Warlock, position, GameConfig::CHASE_RADIUS, id)
            .map(|target| step_towards(position, target))
    }

    pub fn on_no_intent_queued(
        &mut self,
        id: EntityId,
        position: Position,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> Option<Direction> {
        match self {
            Behavior::Warlock | Behavior::DarkHand(_) => None,
            Behavior::Flower => {
                if rng.chance(FLOWER_STAY_CHANCE) {
                    None
                } else {
                    Some(rng.direction())
                }
            }
            Behavior::Mushroom => {
                if rng.chance(MUSHROOM_STAY_CHANCE) {
                    None
                } else if rng.chance(MUSHROOM_WANDER_CHANCE) {
                    Some(rng.direction())
                } else {
                    Self::chase(id, position, view)
                }
            }
            Behavior::Frog { provoked } => {
                let chased = if *provoked {
                    Self::chase(id, position, view)
                } else {
                    None
                };
                match chased {
                    Some(direction) => Some(direction),
                    None if rng.chance(FROG_STAY_CHANCE) => None,
                    None => Some(rng.direction()),
                }
            }
            Behavior::Fireball { heading } => Some(*heading),
        }
    }

    pub fn on_blocked_by_tile(
        &mut self,
        id: EntityId,
        position: Position,
        final_attempt: bool,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> TileResponse {
        match *self {
            Behavior::Fireball { .. } => TileResponse::SelfDestruct,
            _ if final_attempt => TileResponse::Cancel,
            Behavior::Frog { .. } => TileResponse::Retry(rng.direction()),
            _ => match self.on_no_intent_queued(id, position, view, rng) {
                Some(direction) => TileResponse::Retry(direction),
                None => TileResponse::Cancel,
            },
        }
    }

    pub fn on_blocked_by_hostile(&mut self, final_attempt: bool, rng: &mut GameRng) -> HostileResponse {
        match self {
            Behavior::Fireball { .. } => HostileResponse::SelfDestruct,
            Behavior::Frog { .. } if !final_attempt => HostileResponse::Retry(rng.direction()),
            _ => HostileResponse::Attack,
        }
    }

    pub fn on_damaged(&mut self, amount: f64, level: MagicLevel) -> f64 {
        match self {
            Behavior::Warlock => amount * (1 + level.index()) as f64,
            Behavior::Frog { provoked } => {
                *provoked = true;
                amount
            }
            _ => amount,
        }
    }

    pub fn on_destroyed(&self) -> DestroyOutcome {
        match self {
            Behavior::Fireball { .. } | Behavior::DarkHand(_) => DestroyOutcome::Vanish,
            _ => DestroyOutcome::Corpse,
        }
    }

    pub fn blocker_filter(&self) -> BlockerFilter {
        match self {
            Behavior::Warlock => BlockerFilter::ignoring(&[EntityKind::DarkHand]),
            Behavior::Fireball { .. } => BlockerFilter::TILES_ONLY,
            _ => BlockerFilter::ALL,
        }
    }

    pub fn on_new_tick(
        &mut self,
        id: EntityId,
        position: Position,
        allegiance: Allegiance,
        grid: &Grid,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> Vec<TickEffect> {
        match self {
            Behavior::Warlock => view
                .corpse_at(position)
                .filter(|corpse| corpse.magic > 0.0)
                .map(|corpse| vec![TickEffect::Harvest(corpse.id)])
                .unwrap_or_default(),
            Behavior::Fireball { heading } => {
                let ahead = position.offset(*heading);
                let target = view
                    .entities_at(position)
                    .chain(view.entities_at(ahead))
                    .find(|other| {
                        other.id != id
                            && other.alive
                            && other.allegiance != allegiance
                            && other.kind != EntityKind::Fireball
                    });
                match target {
                    Some(target) => vec![TickEffect::Strike(target.id), TickEffect::SelfDestruct],
                    None => Vec::new(),
                }
            }
            Behavior::DarkHand(hand) => {
                hand.grow(grid, rng);
                let mut effects = Vec::new();
                for tile in hand.tiles() {
                    for other in view.entities_at(tile) {
                        if other.id == id || other.allegiance == allegiance {
                            continue;
                        }
                        if other.alive {
                            effects.push(TickEffect::Strike(other.id));
                        }
                        effects.push(TickEffect::Harvest(other.id));
                    }
                }
                effects
            }
            Behavior::Mushroom | Behavior::Flower | Behavior::Frog { .. } => Vec::new(),
        }
    }
}

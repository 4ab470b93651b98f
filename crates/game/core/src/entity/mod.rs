//! Entities and their per-tick state machine.
//!
//! Every entity runs the same driver (see [`crate::engine`]): complete the
//! committed transition at a tick boundary, then on a new tick pick an
//! intent, test it against the collision snapshot and commit to moving,
//! attacking or staying put. Kind-specific behaviour lives in [`Behavior`]
//! and is reached only through the hook methods on [`Entity`].

pub mod behavior;
pub mod dark_hand;
pub mod profile;

use std::collections::VecDeque;

use strum::{AsRefStr, Display, EnumString};

pub use behavior::{Behavior, HostileResponse, TickEffect, TileResponse};
pub use dark_hand::{Branch, DarkHand};
pub use profile::{Allegiance, CreatureProfile, DamageKinds, EntityKind};

use crate::ability::MagicLevel;
use crate::collision::{BlockerFilter, CollisionView};
use crate::grid::Grid;
use crate::rng::GameRng;
use crate::state::{Direction, EntityId, Position};

/// Externally visible state of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityState {
    Idle,
    Moving,
    Attacking,
    Dead,
}

/// Transition committed for the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    #[default]
    Idle,
    /// Interpolating one tile towards the direction.
    Moving(Direction),
    /// One-tick flourish towards the direction, no positional change.
    Attacking(Direction),
}

/// What happens to an entity whose health reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestroyOutcome {
    /// Stays in the world as a dead body until harvested.
    Corpse,
    /// Leaves the world at the end of the pass.
    Vanish,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Position,
    /// Facing; follows the last attempted direction.
    pub direction: Direction,
    /// FIFO of requested steps, one consumed per tick.
    pub queue: VecDeque<Direction>,
    pub motion: Motion,
    /// Direction declared for the tick being resolved.
    pub(crate) intent: Option<Direction>,
    pub health: f64,
    pub max_health: f64,
    /// Magic held by the warlock, or left behind by a corpse.
    pub magic: f64,
    pub damage_kinds: DamageKinds,
    pub damage_amount: f64,
    pub resistances: DamageKinds,
    pub weaknesses: DamageKinds,
    pub allegiance: Allegiance,
    /// Whether hits taken by this entity are shown in the readout.
    pub reports_damage: bool,
    alive: bool,
    pub behavior: Behavior,
}

impl Entity {
    /// Fresh entity of `kind` with its base profile, facing down.
    pub fn new(kind: EntityKind, position: Position) -> Self {
        Self::with_behavior(Behavior::for_kind(kind, position, Direction::Down), position)
    }

    pub fn fireball(position: Position, heading: Direction) -> Self {
        let mut entity = Self::with_behavior(Behavior::Fireball { heading }, position);
        entity.direction = heading;
        entity
    }

    pub fn dark_hand(position: Position, direction: Direction) -> Self {
        let mut entity =
            Self::with_behavior(Behavior::DarkHand(DarkHand::new(position, direction)), position);
        entity.direction = direction;
        entity
    }

    fn with_behavior(behavior: Behavior, position: Position) -> Self {
        let kind = behavior.kind();
        let profile = kind.profile();
        Self {
            kind,
            position,
            direction: Direction::Down,
            queue: VecDeque::new(),
            motion: Motion::Idle,
            intent: None,
            health: profile.max_health,
            max_health: profile.max_health,
            magic: profile.magic,
            damage_kinds: profile.damage_kinds,
            damage_amount: profile.damage_amount,
            resistances: profile.resistances,
            weaknesses: profile.weaknesses,
            allegiance: profile.allegiance,
            reports_damage: profile.reports_damage,
            alive: true,
            behavior,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_hostile_to(&self, other: Allegiance) -> bool {
        self.allegiance != other
    }

    pub fn state(&self) -> EntityState {
        if !self.alive {
            return EntityState::Dead;
        }
        match self.motion {
            Motion::Idle => EntityState::Idle,
            Motion::Moving(_) => EntityState::Moving,
            Motion::Attacking(_) => EntityState::Attacking,
        }
    }

    /// Destination of the committed move, if any.
    pub fn in_flight_destination(&self) -> Option<Position> {
        match self.motion {
            Motion::Moving(direction) => Some(self.position.offset(direction)),
            _ => None,
        }
    }

    /// Destination this entity has claimed but not committed: its declared
    /// intent for this tick, or else the head of its queue.
    pub fn pending_destination(&self) -> Option<Position> {
        self.intent
            .or_else(|| self.queue.front().copied())
            .map(|direction| self.position.offset(direction))
    }

    /// Appends a step to the movement queue.
    pub fn queue_move(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    /// Commits the in-flight move or clears the attack flourish.
    pub fn complete_transition(&mut self) {
        if let Motion::Moving(direction) = self.motion {
            self.position = self.position.offset(direction);
        }
        self.motion = Motion::Idle;
    }

    /// Drops the queue and any declared intent.
    pub fn cancel_movement(&mut self) {
        self.queue.clear();
        self.intent = None;
    }

    /// Next candidate direction: head of the queue, else the default behaviour.
    pub(crate) fn next_intent(
        &mut self,
        id: EntityId,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> Option<Direction> {
        if !self.alive {
            return None;
        }
        match self.queue.pop_front() {
            Some(direction) => Some(direction),
            None => self.on_no_intent_queued(id, view, rng),
        }
    }

    // ===== hooks =====

    pub fn on_no_intent_queued(
        &mut self,
        id: EntityId,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> Option<Direction> {
        self.behavior.on_no_intent_queued(id, self.position, view, rng)
    }

    pub fn on_blocked_by_tile(
        &mut self,
        id: EntityId,
        final_attempt: bool,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> TileResponse {
        self.behavior
            .on_blocked_by_tile(id, self.position, final_attempt, view, rng)
    }

    pub fn on_blocked_by_hostile(&mut self, final_attempt: bool, rng: &mut GameRng) -> HostileResponse {
        self.behavior.on_blocked_by_hostile(final_attempt, rng)
    }

    /// Returns the health actually lost for a raw hit of `amount`.
    pub fn on_damaged(&mut self, amount: f64, level: MagicLevel) -> f64 {
        self.behavior.on_damaged(amount, level)
    }

    /// Marks the entity dead and reports whether it leaves a corpse.
    pub fn on_destroyed(&mut self) -> DestroyOutcome {
        self.alive = false;
        self.motion = Motion::Idle;
        self.cancel_movement();
        self.behavior.on_destroyed()
    }

    /// Runs once per new tick, before intents are declared.
    pub fn on_new_tick(
        &mut self,
        id: EntityId,
        grid: &Grid,
        view: &CollisionView,
        rng: &mut GameRng,
    ) -> Vec<TickEffect> {
        if !self.alive {
            return Vec::new();
        }
        if let Behavior::Fireball { .. } = self.behavior {
            self.damage_amount += behavior::FIREBALL_DAMAGE_RAMP;
        }
        self.behavior
            .on_new_tick(id, self.position, self.allegiance, grid, view, rng)
    }

    pub fn blocker_filter(&self) -> BlockerFilter {
        self.behavior.blocker_filter()
    }

    pub fn is_provoked(&self) -> bool {
        matches!(self.behavior, Behavior::Frog { provoked: true })
    }

    /// Tiles this entity claims for blocking purposes.
    pub fn footprint(&self) -> Option<Vec<Position>> {
        match &self.behavior {
            Behavior::DarkHand(hand) => Some(hand.tiles().into_iter().collect()),
            _ => None,
        }
    }
}

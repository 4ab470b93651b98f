//! The per-tick update pass.
//!
//! On a new tick every entity goes through the same phases, each phase
//! visiting entities in ascending id order:
//!
//! 1. new-tick hooks (projectile contact, hazard growth, corpse harvesting);
//! 2. intent declaration;
//! 3. intent resolution against one reservation snapshot taken after all
//!    intents were declared;
//! 4. settling of contested destinations: every mover whose destination is
//!    claimed by another mover stays where it is;
//! 5. combat for every attack committed in phase 3;
//! 6. removal of entities that vanished during the pass.
//!
//! Because phase 3 only reads the snapshot and the later phases only run
//! after it, two hostile entities stepping into each other both end up
//! attacking and neither moves, whatever their ids. Retried steps are not in
//! the snapshot, so phase 4 is what keeps two retries off the same tile.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::ability::MagicLevel;
use crate::collision::{Blocker, CollisionView};
use crate::combat::{self, AttackProfile, CritRolls};
use crate::config::GameConfig;
use crate::entity::{DestroyOutcome, HostileResponse, Motion, TickEffect, TileResponse};
use crate::event::GameEvent;
use crate::rng::GameRng;
use crate::state::{Direction, EntityId, Position};

use super::World;

/// What an entity committed to in phase 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Commitment {
    Move(Position),
    Attack(Direction, EntityId),
}

/// How one entity's intent was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    Move(Direction),
    Attack(Direction, EntityId),
    /// Nothing to do, or gave up after being blocked.
    Stay { blocked: bool },
    SelfDestruct,
}

pub(super) struct TickPass<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut GameRng,
    pub events: &'a mut Vec<GameEvent>,
    pub level: MagicLevel,
    removals: BTreeSet<EntityId>,
}

impl<'a> TickPass<'a> {
    pub fn new(
        world: &'a mut World,
        rng: &'a mut GameRng,
        events: &'a mut Vec<GameEvent>,
        level: MagicLevel,
    ) -> Self {
        Self {
            world,
            rng,
            events,
            level,
            removals: BTreeSet::new(),
        }
    }

    /// Completes every committed transition.
    pub fn complete_transitions(&mut self) {
        for id in self.world.ids() {
            if let Some(entity) = self.world.entity_mut(id) {
                entity.complete_transition();
            }
        }
    }

    pub fn run(mut self) {
        let ids = self.world.ids();

        self.run_hooks(&ids);
        self.declare_intents(&ids);

        let reservations = self.world.collision_view();
        let mut attacks = Vec::new();
        let mut moves: BTreeMap<Position, Vec<EntityId>> = BTreeMap::new();
        for &id in &ids {
            match self.resolve_intent(id, &reservations) {
                Some(Commitment::Attack(direction, target)) => {
                    trace!(attacker = %id, defender = %target, ?direction, "attack committed");
                    attacks.push((id, target));
                }
                Some(Commitment::Move(destination)) => {
                    moves.entry(destination).or_default().push(id);
                }
                None => {}
            }
        }
        self.settle_contested_moves(moves);

        for (attacker, defender) in attacks {
            let alive_at_start = reservations
                .get(defender)
                .is_some_and(|occupant| occupant.alive);
            if !alive_at_start {
                continue;
            }
            if let Some(profile) = self.world.entity(attacker).map(AttackProfile::from) {
                self.strike(attacker, profile, defender);
            }
        }

        for id in std::mem::take(&mut self.removals) {
            self.world.remove_entity(id);
        }
    }

    fn run_hooks(&mut self, ids: &[EntityId]) {
        let view = self.world.collision_view();
        for &id in ids {
            if self.removals.contains(&id) {
                continue;
            }
            let Some((grid, entity)) = self.world.grid_and_entity_mut(id) else {
                continue;
            };
            let effects = entity.on_new_tick(id, grid, &view, self.rng);
            for effect in effects {
                match effect {
                    TickEffect::Strike(target) => {
                        if let Some(profile) = self.world.entity(id).map(AttackProfile::from) {
                            self.strike(id, profile, target);
                        }
                    }
                    TickEffect::Harvest(corpse) => self.harvest(id, corpse),
                    TickEffect::SelfDestruct => self.self_destruct(id),
                }
            }
        }
    }

    fn declare_intents(&mut self, ids: &[EntityId]) {
        let view = self.world.collision_view();
        for &id in ids {
            if self.removals.contains(&id) {
                continue;
            }
            if let Some(entity) = self.world.entity_mut(id) {
                entity.intent = entity.next_intent(id, &view, self.rng);
            }
        }
    }

    /// Settles one entity's intent against the reservation snapshot.
    fn resolve_intent(
        &mut self,
        id: EntityId,
        reservations: &CollisionView,
    ) -> Option<Commitment> {
        if self.removals.contains(&id) {
            return None;
        }
        let (grid, entity) = self.world.grid_and_entity_mut(id)?;
        let mut candidate = entity.intent.take();
        let filter = entity.blocker_filter();
        let mut attempts = 0;

        let resolution = loop {
            let Some(direction) = candidate else {
                break Resolution::Stay { blocked: false };
            };
            attempts += 1;
            let final_attempt = attempts >= GameConfig::MAX_MOVE_ATTEMPTS;
            entity.direction = direction;
            let destination = entity.position.offset(direction);

            match reservations.blocker_at(grid, destination, Some(id), filter) {
                None => break Resolution::Move(direction),
                Some(Blocker::Entity {
                    id: target,
                    allegiance,
                    ..
                }) if entity.is_hostile_to(allegiance) => {
                    match entity.on_blocked_by_hostile(final_attempt, self.rng) {
                        HostileResponse::Attack => break Resolution::Attack(direction, target),
                        HostileResponse::SelfDestruct => break Resolution::SelfDestruct,
                        HostileResponse::Retry(next) => candidate = Some(next),
                    }
                }
                Some(_) => match entity.on_blocked_by_tile(id, final_attempt, reservations, self.rng) {
                    TileResponse::Retry(next) => candidate = Some(next),
                    TileResponse::Cancel => break Resolution::Stay { blocked: true },
                    TileResponse::SelfDestruct => break Resolution::SelfDestruct,
                },
            }

            if final_attempt {
                break Resolution::Stay { blocked: true };
            }
        };

        trace!(%id, ?resolution, attempts, "intent resolved");
        match resolution {
            Resolution::Move(direction) => {
                entity.motion = Motion::Moving(direction);
                Some(Commitment::Move(entity.position.offset(direction)))
            }
            Resolution::Attack(direction, target) => {
                entity.motion = Motion::Attacking(direction);
                entity.cancel_movement();
                Some(Commitment::Attack(direction, target))
            }
            Resolution::Stay { blocked } => {
                if blocked {
                    entity.cancel_movement();
                }
                None
            }
            Resolution::SelfDestruct => {
                self.self_destruct(id);
                None
            }
        }
    }

    /// Cancels every move whose destination more than one mover claimed.
    fn settle_contested_moves(&mut self, moves: BTreeMap<Position, Vec<EntityId>>) {
        for (destination, movers) in moves {
            if movers.len() < 2 {
                continue;
            }
            trace!(%destination, ?movers, "destination contested");
            for id in movers {
                if let Some(entity) = self.world.entity_mut(id) {
                    entity.motion = Motion::Idle;
                    entity.cancel_movement();
                }
            }
        }
    }

    fn strike(&mut self, attacker: EntityId, profile: AttackProfile, defender_id: EntityId) {
        let rolls = CritRolls::roll(self.rng);
        let silenced = self.world.damage_reports_silenced();
        let Some(defender) = self.world.entity_mut(defender_id) else {
            return;
        };
        let resolution = combat::resolve(&profile, defender, rolls, self.level);
        let position = defender.position;
        if defender.reports_damage && !silenced {
            self.events.push(GameEvent::Damage {
                attacker,
                defender: defender_id,
                position,
                result: resolution.result,
            });
        }
        if let Some(outcome) = resolution.destroyed {
            self.destroyed(defender_id, outcome);
        }
    }

    fn self_destruct(&mut self, id: EntityId) {
        let outcome = match self.world.entity_mut(id) {
            Some(entity) if entity.is_alive() => entity.on_destroyed(),
            _ => return,
        };
        self.destroyed(id, outcome);
    }

    fn destroyed(&mut self, id: EntityId, outcome: DestroyOutcome) {
        let Some(entity) = self.world.entity(id) else {
            return;
        };
        let (kind, position) = (entity.kind, entity.position);
        trace!(%id, %kind, ?outcome, "entity destroyed");
        self.events.push(GameEvent::EntityDestroyed { id, kind, position });
        if id.is_player() {
            self.events.push(GameEvent::PlayerDestroyed { position });
        }
        if outcome == DestroyOutcome::Vanish {
            self.removals.insert(id);
        }
    }

    /// Moves a corpse's magic into the living warlock and removes the corpse.
    fn harvest(&mut self, harvester: EntityId, corpse_id: EntityId) {
        let Some(harvester_kind) = self.world.entity(harvester).map(|entity| entity.kind) else {
            return;
        };
        if !self.world.player().is_some_and(|player| player.is_alive()) {
            return;
        }
        let Some(corpse) = self.world.entity_mut(corpse_id) else {
            return;
        };
        if corpse.is_alive() || corpse.magic <= 0.0 {
            return;
        }
        let magic = std::mem::take(&mut corpse.magic);
        let position = corpse.position;
        let amount = self.rng.uniform(magic / 2.0, magic * 1.5);
        if let Some(player) = self.world.player_mut() {
            player.magic += amount;
        }
        self.removals.insert(corpse_id);
        self.events.push(GameEvent::MagicGained {
            amount,
            position,
            harvester: harvester_kind,
        });
    }
}

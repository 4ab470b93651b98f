//! Magic-funded abilities and the level progression that unlocks them.
//!
//! An [`Ability`] is paid for with the warlock's magic. Casting checks the
//! price first, then runs the effect; only an effect that actually happened
//! is paid for.

pub mod progression;

use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

pub use progression::{LevelUp, MagicLevel, Progression};

use crate::engine::World;
use crate::entity::Entity;
use crate::event::GameEvent;
use crate::rng::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityKind {
    Heal,
    DarkHand,
    Fireball,
    Eraser,
}

impl AbilityKind {
    /// Unlock order; also the slot order.
    pub const UNLOCK_ORDER: [AbilityKind; 4] = [
        AbilityKind::Heal,
        AbilityKind::DarkHand,
        AbilityKind::Fireball,
        AbilityKind::Eraser,
    ];

    pub const fn cost(self) -> f64 {
        match self {
            AbilityKind::Heal => 8.0,
            AbilityKind::DarkHand => 10.0,
            AbilityKind::Fireball => 20.0,
            AbilityKind::Eraser => 50.0,
        }
    }
}

/// An unlocked ability slot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub kind: AbilityKind,
    pub cost: f64,
}

/// Everything an ability effect may touch.
pub struct AbilityContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut GameRng,
    pub events: &'a mut Vec<GameEvent>,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cost: kind.cost(),
        }
    }

    pub fn with_cost(kind: AbilityKind, cost: f64) -> Self {
        Self { kind, cost }
    }

    /// Whether casting would currently succeed for `caster`.
    pub fn usable(&self, caster: &Entity) -> bool {
        if !caster.is_alive() || self.cost > caster.magic {
            return false;
        }
        match self.kind {
            AbilityKind::Heal => caster.health < caster.max_health,
            _ => true,
        }
    }

    /// Pays for and runs the effect. Returns false, changing nothing, when
    /// the warlock cannot afford it or the effect declines.
    pub fn cast(&self, ctx: &mut AbilityContext<'_>) -> bool {
        let Some(caster) = ctx.world.player() else {
            return false;
        };
        if !caster.is_alive() || self.cost > caster.magic {
            return false;
        }
        if !self.apply(ctx) {
            return false;
        }
        let Some(caster) = ctx.world.player_mut() else {
            return false;
        };
        caster.magic -= self.cost;
        debug!(ability = %self.kind, remaining = caster.magic, "ability cast");
        ctx.events.push(GameEvent::AbilityUsed {
            ability: self.kind,
            remaining_magic: caster.magic,
        });
        true
    }

    fn apply(&self, ctx: &mut AbilityContext<'_>) -> bool {
        let Some(caster) = ctx.world.player_mut() else {
            return false;
        };
        let (position, facing) = (caster.position, caster.direction);
        match self.kind {
            AbilityKind::Heal => {
                if caster.health >= caster.max_health {
                    return false;
                }
                let max = caster.max_health;
                let amount = ctx.rng.uniform(max / 5.0, (max / 4.0).floor());
                caster.health = (caster.health + amount).min(max);
                ctx.events.push(GameEvent::Healed { amount, position });
                true
            }
            AbilityKind::Fireball => {
                ctx.world.add_entity(Entity::fireball(position, facing), position);
                true
            }
            AbilityKind::DarkHand => {
                let target = position.offset(facing);
                if !ctx.world.grid().is_walkable(target) {
                    return false;
                }
                ctx.world.add_entity(Entity::dark_hand(target, facing), target);
                true
            }
            AbilityKind::Eraser => {
                let erased = ctx.world.erase_non_players();
                ctx.events.extend(erased.iter().map(|(id, entity)| {
                    GameEvent::EntityDestroyed {
                        id: *id,
                        kind: entity.kind,
                        position: entity.position,
                    }
                }));
                ctx.world.silence_damage_reports();
                ctx.events.push(GameEvent::WorldErased {
                    destroyed: erased.len(),
                });
                true
            }
        }
    }
}

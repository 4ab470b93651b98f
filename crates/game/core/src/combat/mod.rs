//! Combat resolution.
//!
//! A resolution reads the attacker's [`AttackProfile`], computes potency from
//! effectiveness and the critical draws, then lets the defender's damage hook
//! decide how much health is actually lost. The resolver never formats text;
//! [`DamageResult`]'s `Display` is the readout sentence.

pub mod crit;
pub mod damage;
pub mod result;

pub use crit::{CritKind, CritRolls};
pub use damage::{BASE_POTENCY, apply_damage, effectiveness};
pub use result::DamageResult;

use crate::ability::MagicLevel;
use crate::entity::{DamageKinds, DestroyOutcome, Entity, EntityKind};

/// What an attacker brings to a fight, copied out before mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    pub kind: EntityKind,
    pub damage_kinds: DamageKinds,
    pub damage_amount: f64,
}

impl From<&Entity> for AttackProfile {
    fn from(entity: &Entity) -> Self {
        Self {
            kind: entity.kind,
            damage_kinds: entity.damage_kinds,
            damage_amount: entity.damage_amount,
        }
    }
}

/// Result of [`resolve`] plus the defender's fate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub result: DamageResult,
    /// Set when this hit took the defender's health to zero.
    pub destroyed: Option<DestroyOutcome>,
}

/// Resolves one hit of `attacker` on `defender`.
///
/// `level` is the current magic level, consulted by level-scaled damage hooks.
pub fn resolve(
    attacker: &AttackProfile,
    defender: &mut Entity,
    rolls: CritRolls,
    level: MagicLevel,
) -> Resolution {
    let effectiveness = effectiveness(
        attacker.damage_kinds,
        defender.weaknesses,
        defender.resistances,
    );
    let (crit_delta, crit) = rolls.apply();
    let potency = BASE_POTENCY + effectiveness + crit_delta;

    let amount = defender.on_damaged(attacker.damage_amount * potency, level);
    let was_alive = defender.is_alive();
    defender.health = apply_damage(defender.health, amount);

    let destroyed = (was_alive && defender.health <= 0.0).then(|| defender.on_destroyed());

    Resolution {
        result: DamageResult {
            source: attacker.kind,
            target: defender.kind,
            amount,
            effectiveness,
            crit,
        },
        destroyed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;
    use crate::state::Position;

    fn attacker(kinds: DamageKinds) -> AttackProfile {
        AttackProfile {
            kind: EntityKind::Flower,
            damage_kinds: kinds,
            damage_amount: 10.0,
        }
    }

    fn sturdy_frog() -> Entity {
        let mut frog = Entity::new(EntityKind::Frog, Position::ORIGIN);
        frog.max_health = 100.0;
        frog.health = 100.0;
        frog
    }

    #[test]
    fn one_weakness_deals_six() {
        let mut frog = sturdy_frog();
        let outcome = resolve(&attacker(DamageKinds::FIRE), &mut frog, CritRolls::NONE, MagicLevel::None);
        assert!((outcome.result.amount - 6.0).abs() < 1e-9);
        assert!((frog.health - 94.0).abs() < 1e-9);
        assert_eq!(outcome.result.effectiveness_sign(), 1);
        assert_eq!(outcome.destroyed, None);
    }

    #[test]
    fn one_resistance_deals_four() {
        let mut frog = sturdy_frog();
        let outcome = resolve(&attacker(DamageKinds::WATER), &mut frog, CritRolls::NONE, MagicLevel::None);
        assert!((outcome.result.amount - 4.0).abs() < 1e-9);
        assert_eq!(outcome.result.effectiveness_sign(), -1);
    }

    #[test]
    fn forced_success_adds_potency() {
        let mut frog = sturdy_frog();
        let outcome = resolve(
            &attacker(DamageKinds::FIRE),
            &mut frog,
            CritRolls::new(true, false),
            MagicLevel::None,
        );
        assert!((outcome.result.amount - 8.0).abs() < 1e-9);
        assert_eq!(outcome.result.crit, CritKind::Success);
    }

    #[test]
    fn both_crits_nearly_cancel() {
        let mut frog = sturdy_frog();
        let outcome = resolve(
            &attacker(DamageKinds::FIRE),
            &mut frog,
            CritRolls::new(true, true),
            MagicLevel::None,
        );
        assert!((outcome.result.amount - 6.0).abs() < 1e-9);
        assert_eq!(outcome.result.crit, CritKind::Fail);
    }

    #[test]
    fn lethal_hit_leaves_a_corpse() {
        let mut frog = Entity::new(EntityKind::Frog, Position::ORIGIN);
        let outcome = resolve(&attacker(DamageKinds::FIRE), &mut frog, CritRolls::NONE, MagicLevel::None);
        assert_eq!(outcome.destroyed, Some(DestroyOutcome::Corpse));
        assert_eq!(frog.health, 0.0);
        assert_eq!(frog.state(), EntityState::Dead);

        let again = resolve(&attacker(DamageKinds::FIRE), &mut frog, CritRolls::NONE, MagicLevel::None);
        assert_eq!(again.destroyed, None);
    }

    #[test]
    fn warlock_damage_scales_with_level() {
        let mut warlock = Entity::new(EntityKind::Warlock, Position::ORIGIN);
        warlock.max_health = 100.0;
        warlock.health = 100.0;
        let outcome = resolve(
            &attacker(DamageKinds::PHYSICAL),
            &mut warlock,
            CritRolls::NONE,
            MagicLevel::Level2,
        );
        assert!((outcome.result.amount - 15.0).abs() < 1e-9);
    }

    #[test]
    fn frog_is_provoked_by_damage() {
        let mut frog = sturdy_frog();
        assert!(!frog.is_provoked());
        resolve(&attacker(DamageKinds::PHYSICAL), &mut frog, CritRolls::NONE, MagicLevel::None);
        assert!(frog.is_provoked());
    }
}

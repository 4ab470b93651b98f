//! Effectiveness and potency math.

use crate::entity::DamageKinds;

/// Potency before effectiveness and critical draws.
pub const BASE_POTENCY: f64 = 0.5;
/// Effectiveness contributed by each matching weakness or resistance.
pub const EFFECTIVENESS_STEP: f64 = 0.1;

/// Sum over the attacker's kinds: `+0.1` per weakness, `-0.1` per resistance.
///
/// A kind listed as both counts as a weakness.
pub fn effectiveness(attack: DamageKinds, weaknesses: DamageKinds, resistances: DamageKinds) -> f64 {
    attack.iter().fold(0.0, |total, kind| {
        if weaknesses.contains(kind) {
            total + EFFECTIVENESS_STEP
        } else if resistances.contains(kind) {
            total - EFFECTIVENESS_STEP
        } else {
            total
        }
    })
}

/// Health subtracted from `health`, clamped so it never goes negative.
pub fn apply_damage(health: f64, amount: f64) -> f64 {
    (health - amount).max(0.0)
}

//! Static per-kind stats.

use bitflags::bitflags;
use strum::{AsRefStr, Display, EnumString};

bitflags! {
    /// Set of damage kinds dealt, resisted or feared by an entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageKinds: u8 {
        const PHYSICAL = 1 << 0;
        const FIRE = 1 << 1;
        const LIGHT = 1 << 2;
        const DARK = 1 << 3;
        const EARTH = 1 << 4;
        const WATER = 1 << 5;
    }
}

/// Which side an entity fights for. Entities of different allegiance are hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Allegiance {
    Warlock,
    Nature,
}

/// Every kind of entity the simulation knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Warlock,
    Mushroom,
    Flower,
    Frog,
    Fireball,
    DarkHand,
}

impl EntityKind {
    /// Name used in the combat readout.
    pub const fn display_name(self) -> &'static str {
        match self {
            EntityKind::Warlock => "warlock",
            EntityKind::Mushroom => "mushroom",
            EntityKind::Flower => "flower",
            EntityKind::Frog => "frog",
            EntityKind::Fireball => "fireball",
            EntityKind::DarkHand => "dark hand",
        }
    }

    pub fn profile(self) -> CreatureProfile {
        match self {
            EntityKind::Warlock => CreatureProfile {
                max_health: 10.0,
                magic: 0.0,
                damage_kinds: DamageKinds::PHYSICAL | DamageKinds::DARK,
                damage_amount: 2.0,
                resistances: DamageKinds::DARK | DamageKinds::EARTH | DamageKinds::WATER,
                weaknesses: DamageKinds::FIRE | DamageKinds::LIGHT,
                allegiance: Allegiance::Warlock,
                reports_damage: true,
            },
            EntityKind::Mushroom => CreatureProfile {
                max_health: 2.0,
                magic: 5.0,
                damage_kinds: DamageKinds::EARTH | DamageKinds::DARK,
                damage_amount: 2.0,
                resistances: DamageKinds::EARTH | DamageKinds::DARK,
                weaknesses: DamageKinds::FIRE | DamageKinds::LIGHT | DamageKinds::PHYSICAL,
                allegiance: Allegiance::Nature,
                reports_damage: true,
            },
            EntityKind::Flower => CreatureProfile {
                max_health: 5.0,
                magic: 2.0,
                damage_kinds: DamageKinds::PHYSICAL,
                damage_amount: 1.5,
                resistances: DamageKinds::EARTH | DamageKinds::LIGHT | DamageKinds::WATER,
                weaknesses: DamageKinds::FIRE | DamageKinds::DARK | DamageKinds::PHYSICAL,
                allegiance: Allegiance::Nature,
                reports_damage: true,
            },
            EntityKind::Frog => CreatureProfile {
                max_health: 2.0,
                magic: 10.0,
                damage_kinds: DamageKinds::EARTH | DamageKinds::WATER,
                damage_amount: 2.5,
                resistances: DamageKinds::EARTH | DamageKinds::WATER | DamageKinds::PHYSICAL,
                weaknesses: DamageKinds::FIRE | DamageKinds::PHYSICAL,
                allegiance: Allegiance::Nature,
                reports_damage: true,
            },
            EntityKind::Fireball => CreatureProfile {
                max_health: 20.0,
                magic: 0.0,
                damage_kinds: DamageKinds::FIRE,
                damage_amount: 2.0,
                resistances: DamageKinds::empty(),
                weaknesses: DamageKinds::empty(),
                allegiance: Allegiance::Warlock,
                reports_damage: false,
            },
            EntityKind::DarkHand => CreatureProfile {
                max_health: f64::INFINITY,
                magic: 0.0,
                damage_kinds: DamageKinds::DARK,
                damage_amount: 50.0,
                resistances: DamageKinds::empty(),
                weaknesses: DamageKinds::empty(),
                allegiance: Allegiance::Warlock,
                reports_damage: false,
            },
        }
    }
}

/// Base stats an entity of a given kind starts with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureProfile {
    pub max_health: f64,
    pub magic: f64,
    pub damage_kinds: DamageKinds,
    pub damage_amount: f64,
    pub resistances: DamageKinds,
    pub weaknesses: DamageKinds,
    pub allegiance: Allegiance,
    pub reports_damage: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inhabitants_side_with_nature() {
        for kind in [EntityKind::Mushroom, EntityKind::Flower, EntityKind::Frog] {
            assert_eq!(kind.profile().allegiance, Allegiance::Nature);
            assert!(kind.profile().magic > 0.0);
        }
        assert_eq!(EntityKind::Fireball.profile().allegiance, Allegiance::Warlock);
    }

    #[test]
    fn hazards_do_not_report_damage() {
        assert!(!EntityKind::Fireball.profile().reports_damage);
        assert!(!EntityKind::DarkHand.profile().reports_damage);
        assert!(EntityKind::DarkHand.profile().max_health.is_infinite());
    }

    #[test]
    fn kind_names() {
        assert_eq!(EntityKind::DarkHand.to_string(), "dark_hand");
        assert_eq!(EntityKind::DarkHand.display_name(), "dark hand");
    }
}

//! Threshold-gated magic levels.

use arrayvec::ArrayVec;
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

use crate::config::GameConfig;
use crate::entity::Entity;

use super::{Ability, AbilityKind};

/// Ordered magic level of the warlock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MagicLevel {
    #[default]
    None,
    Level1,
    Level2,
    Level3,
    Level4,
}

impl MagicLevel {
    pub const fn index(self) -> usize {
        match self {
            MagicLevel::None => 0,
            MagicLevel::Level1 => 1,
            MagicLevel::Level2 => 2,
            MagicLevel::Level3 => 3,
            MagicLevel::Level4 => 4,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            MagicLevel::None => Some(MagicLevel::Level1),
            MagicLevel::Level1 => Some(MagicLevel::Level2),
            MagicLevel::Level2 => Some(MagicLevel::Level3),
            MagicLevel::Level3 => Some(MagicLevel::Level4),
            MagicLevel::Level4 => None,
        }
    }
}

/// Emitted when a threshold check advances the level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub level: MagicLevel,
    pub ability: AbilityKind,
    pub max_health: f64,
}

/// Magic level plus the abilities it has unlocked so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Progression {
    level: MagicLevel,
    thresholds: [f64; 4],
    unlocked: ArrayVec<Ability, { GameConfig::MAX_ABILITY_SLOTS }>,
}

impl Progression {
    pub fn new(thresholds: [f64; 4]) -> Self {
        Self {
            level: MagicLevel::None,
            thresholds,
            unlocked: ArrayVec::new(),
        }
    }

    pub fn level(&self) -> MagicLevel {
        self.level
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.unlocked
    }

    pub fn ability(&self, slot: usize) -> Option<&Ability> {
        self.unlocked.get(slot)
    }

    /// Magic required for the next level, if any remains.
    pub fn next_threshold(&self) -> Option<f64> {
        self.thresholds.get(self.level.index()).copied()
    }

    /// Advances at most one level when `player.magic` has reached the next
    /// threshold: unlocks the next ability and doubles max health.
    pub fn check(&mut self, player: &mut Entity) -> Option<LevelUp> {
        let threshold = self.next_threshold()?;
        if player.magic < threshold {
            return None;
        }
        let level = self.level.next()?;
        let ability = *AbilityKind::UNLOCK_ORDER.get(self.level.index())?;
        self.unlocked.try_push(Ability::new(ability)).ok()?;
        self.level = level;
        player.max_health *= 2.0;
        debug!(%level, %ability, max_health = player.max_health, "level up");
        Some(LevelUp {
            level,
            ability,
            max_health: player.max_health,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.thresholds);
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_THRESHOLDS)
    }
}

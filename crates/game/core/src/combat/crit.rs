//! Critical roll outcomes.

use strum::{AsRefStr, Display, EnumString};

use crate::rng::GameRng;

/// Chance of each critical draw.
pub const CRIT_CHANCE: f64 = 0.1;
/// Potency swing of a critical draw.
pub const CRIT_POTENCY: f64 = 0.2;

/// Reported critical outcome of a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CritKind {
    #[default]
    None,
    Fail,
    Success,
}

/// The two independent critical draws of one resolution.
///
/// Both may fire together; the failure is then the reported kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CritRolls {
    pub success: bool,
    pub fail: bool,
}

impl CritRolls {
    pub const NONE: Self = Self {
        success: false,
        fail: false,
    };

    pub const fn new(success: bool, fail: bool) -> Self {
        Self { success, fail }
    }

    /// Draws success first, then failure.
    pub fn roll(rng: &mut GameRng) -> Self {
        let success = rng.chance(CRIT_CHANCE);
        let fail = rng.chance(CRIT_CHANCE);
        Self { success, fail }
    }

    /// Net potency change and the kind to report.
    pub fn apply(self) -> (f64, CritKind) {
        let mut delta = 0.0;
        let mut kind = CritKind::None;
        if self.success {
            delta += CRIT_POTENCY;
            kind = CritKind::Success;
        }
        if self.fail {
            delta -= CRIT_POTENCY;
            kind = CritKind::Fail;
        }
        (delta, kind)
    }
}

//! Errors surfaced when a player input is refused.

use crate::ability::AbilityKind;
use crate::error::{ErrorSeverity, GameError};

/// Reasons [`super::GameEngine::submit`] did not start a tick.
///
/// None of these change the simulation; the host simply drops the input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputError {
    #[error("a tick is still in progress or the clock is frozen")]
    GateClosed,

    #[error("the warlock is dead")]
    PlayerDead,

    #[error("ability slot {slot} is empty")]
    EmptySlot { slot: usize },

    #[error("{ability} cannot be cast right now")]
    AbilityDeclined { ability: AbilityKind },
}

impl GameError for InputError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InputError::GateClosed => ErrorSeverity::Recoverable,
            InputError::PlayerDead => ErrorSeverity::Recoverable,
            InputError::EmptySlot { .. } | InputError::AbilityDeclined { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InputError::GateClosed => "INPUT_GATE_CLOSED",
            InputError::PlayerDead => "INPUT_PLAYER_DEAD",
            InputError::EmptySlot { .. } => "INPUT_EMPTY_SLOT",
            InputError::AbilityDeclined { .. } => "INPUT_ABILITY_DECLINED",
        }
    }
}

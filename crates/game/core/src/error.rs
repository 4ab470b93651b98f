//! Common error infrastructure for game-core.
//!
//! The simulation itself never fails: blocked moves, unaffordable abilities
//! and missing entities are expressed as no-ops or `Option`s. Errors only
//! arise at the edges (configuration, refused inputs), and every error type implements
//! [`GameError`] so hosts can classify it uniformly.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retrying later may succeed.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// The host cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game errors.
///
/// Implemented by `ConfigError` and `InputError` here and by the runtime's error type, so
/// logging and retry decisions can be made without matching on variants.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

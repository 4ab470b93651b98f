use crate::error::{ErrorSeverity, GameError};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Seed of the level RNG stream. Every `generate()` keeps drawing from it.
    pub seed: u64,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Frames between two simulation ticks.
    pub tick_length: u32,
    /// Frames the clock stays frozen after a level-up.
    pub level_up_freeze: u32,
    /// Magic required for levels one through four, strictly increasing.
    pub thresholds: [f64; 4],
    pub generation: GenerationConfig,
}

impl GameConfig {
    // ===== compile-time limits =====
    /// Ability slots; one per magic level.
    pub const MAX_ABILITY_SLOTS: usize = 4;
    /// Candidate directions tried by an entity per tick before it gives up.
    pub const MAX_MOVE_ATTEMPTS: usize = 3;
    /// Carve steps shared by both legs of one corridor.
    pub const CORRIDOR_STEP_LIMIT: u32 = 100;
    /// Placement attempts per room before the room is abandoned.
    pub const ROOM_ATTEMPT_LIMIT: u32 = 100;
    /// Failed attempts after which the room size range starts shrinking.
    pub const ROOM_SHRINK_AFTER: u32 = 50;
    pub const MIN_ROOM_SIZE: i32 = 5;
    /// Average-axis distance within which chasing creatures notice the warlock.
    pub const CHASE_RADIUS: f64 = 5.0;
    /// Smallest grid that still fits the first room.
    pub const MIN_GRID_SIZE: u32 = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5EED;
    pub const DEFAULT_GRID_SIZE: u32 = 64;
    pub const DEFAULT_TICK_LENGTH: u32 = 10;
    pub const DEFAULT_LEVEL_UP_FREEZE: u32 = 60;
    pub const DEFAULT_THRESHOLDS: [f64; 4] = [25.0, 75.0, 200.0, 500.0];

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            grid_width: Self::DEFAULT_GRID_SIZE,
            grid_height: Self::DEFAULT_GRID_SIZE,
            tick_length: Self::DEFAULT_TICK_LENGTH,
            level_up_freeze: Self::DEFAULT_LEVEL_UP_FREEZE,
            thresholds: Self::DEFAULT_THRESHOLDS,
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < Self::MIN_GRID_SIZE || self.grid_height < Self::MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                minimum: Self::MIN_GRID_SIZE,
            });
        }
        if self.tick_length == 0 {
            return Err(ConfigError::ZeroTickLength);
        }
        let mut previous = 0.0;
        for (index, threshold) in self.thresholds.iter().copied().enumerate() {
            if !threshold.is_finite() || threshold <= previous {
                return Err(ConfigError::UnorderedThresholds {
                    level: index + 1,
                    threshold,
                });
            }
            previous = threshold;
        }
        if self.generation.spawn_attempt_limit == Some(0) {
            return Err(ConfigError::ZeroSpawnLimit);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Knobs of the dungeon generator that are not part of the level design.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    /// Upper bound on resampling an inhabitant's tile. `None` retries forever.
    pub spawn_attempt_limit: Option<u32>,
}

/// Rejected [`GameConfig`] values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is smaller than the {minimum}x{minimum} minimum")]
    GridTooSmall { width: u32, height: u32, minimum: u32 },

    #[error("tick length must be at least one frame")]
    ZeroTickLength,

    #[error("threshold for level {level} ({threshold}) must exceed the previous one")]
    UnorderedThresholds { level: usize, threshold: f64 },

    #[error("spawn attempt limit must be positive when set")]
    ZeroSpawnLimit,
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GridTooSmall { .. } => "CONFIG_GRID_TOO_SMALL",
            Self::ZeroTickLength => "CONFIG_ZERO_TICK_LENGTH",
            Self::UnorderedThresholds { .. } => "CONFIG_UNORDERED_THRESHOLDS",
            Self::ZeroSpawnLimit => "CONFIG_ZERO_SPAWN_LIMIT",
        }
    }
}

//! Tunable game data kept outside the simulation code.
//!
//! The dungeon itself is always procedurally generated; what lives here is
//! the numeric tuning a host may want to change without recompiling (seed,
//! grid size, clock pacing, level thresholds), read from TOML.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::ConfigLoader;

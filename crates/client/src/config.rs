//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the headless client needs before the runtime exists.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Overrides the seed from the game config file.
    pub seed: Option<u64>,
    /// TOML game config; built-in defaults when absent.
    pub config_path: Option<PathBuf>,
    /// Stop after this long. Runs until Ctrl-C when `None`.
    pub run_for: Option<Duration>,
    pub frame_interval: Duration,
    /// Fraction of open frames on which the autopilot acts.
    pub input_chance: f64,
    pub messages: MessageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            config_path: None,
            run_for: Some(Duration::from_secs(30)),
            frame_interval: Duration::from_millis(16),
            input_chance: 0.25,
            messages: MessageConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WARLOCK_SEED` - RNG seed (default: from the game config)
    /// - `WARLOCK_CONFIG` - Path to a TOML game config (default: built-in)
    /// - `WARLOCK_RUN_SECONDS` - Session length, `0` runs until Ctrl-C (default: 30)
    /// - `WARLOCK_FRAME_MILLIS` - Frame interval (default: 16)
    /// - `WARLOCK_INPUT_CHANCE` - Autopilot activity in `[0, 1]` (default: 0.25)
    /// - `WARLOCK_MESSAGE_CAPACITY` - Readout lines kept (default: 5)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("WARLOCK_SEED");
        config.config_path = env::var("WARLOCK_CONFIG").ok().map(PathBuf::from);

        if let Some(seconds) = read_env::<u64>("WARLOCK_RUN_SECONDS") {
            config.run_for = (seconds > 0).then(|| Duration::from_secs(seconds));
        }
        if let Some(millis) = read_env::<u64>("WARLOCK_FRAME_MILLIS") {
            config.frame_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(chance) = read_env::<f64>("WARLOCK_INPUT_CHANCE") {
            config.input_chance = chance.clamp(0.0, 1.0);
        }
        if let Some(capacity) = read_env::<usize>("WARLOCK_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { capacity: 5 }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

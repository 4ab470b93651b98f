//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::GameConfig;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`GameConfig`] TOML files.
///
/// Every key is optional; missing keys keep their defaults. The parsed
/// config is validated before it is returned.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads and validates the TOML file at `path`.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid game config in {}", path.display()))?;
        debug!(path = %path.display(), seed = config.seed, "game config loaded");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content).context("failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> LoadResult<GameConfig> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(GameConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::ConfigError;
    use tempfile::NamedTempFile;

    use super::*;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_files_keep_defaults() {
        let file = write("seed = 99\ntick_length = 4\n");
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.tick_length, 4);
        assert_eq!(config.grid_width, GameConfig::DEFAULT_GRID_SIZE);
        assert_eq!(config.thresholds, GameConfig::DEFAULT_THRESHOLDS);
        assert_eq!(config.generation.spawn_attempt_limit, None);
    }

    #[test]
    fn nested_generation_table() {
        let config = ConfigLoader::parse(
            r#"
            grid_width = 48
            grid_height = 40
            thresholds = [10.0, 20.0, 40.0, 80.0]

            [generation]
            spawn_attempt_limit = 500
            "#,
        )
        .unwrap();
        assert_eq!((config.grid_width, config.grid_height), (48, 40));
        assert_eq!(config.generation.spawn_attempt_limit, Some(500));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ConfigLoader::parse("thresholds = [50.0, 20.0, 40.0, 80.0]").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnorderedThresholds { .. })
        ));

        let file = write("grid_width = 4");
        let err = ConfigLoader::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid game config"));
    }

    #[test]
    fn malformed_toml_and_missing_files_fail() {
        assert!(ConfigLoader::parse("seed = \"many\"").is_err());
        let missing = Path::new("/definitely/not/here.toml");
        let err = ConfigLoader::load(missing).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(ConfigLoader::load_or_default(None).unwrap(), GameConfig::default());
    }
}

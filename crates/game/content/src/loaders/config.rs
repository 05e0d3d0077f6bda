//! Game configuration loader.

use std::path::Path;

use skirmish_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`GameConfig::default`] values. A non-positive
    /// timestep is rejected.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.fixed_timestep.is_finite() && config.fixed_timestep > 0.0) {
            anyhow::bail!(
                "fixed_timestep must be positive, got {}",
                config.fixed_timestep
            );
        }
        Ok(config)
    }
}

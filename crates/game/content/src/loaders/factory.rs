//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use skirmish_core::GameConfig;
use tracing::info;

use crate::catalog::{AbilityCatalog, StatusCatalog};
use crate::loaders::{AbilityLoader, ConfigLoader, LoadResult, StatusLoader};

/// Everything loaded from one data directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Content {
    pub config: GameConfig,
    pub statuses: StatusCatalog,
    pub abilities: AbilityCatalog,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── statuses.ron
/// └── abilities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or the defaults if it is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the status catalog from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<StatusCatalog> {
        let path = self.data_dir.join("statuses.ron");
        StatusLoader::load(&path)
    }

    /// Load the ability catalog from `abilities.ron`.
    ///
    /// Channel abilities are resolved against `statuses`.
    pub fn load_abilities(&self, statuses: &StatusCatalog) -> LoadResult<AbilityCatalog> {
        let path = self.data_dir.join("abilities.ron");
        AbilityLoader::load(&path, statuses)
    }

    /// Load every file in dependency order.
    pub fn load_all(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let statuses = self.load_statuses()?;
        let abilities = self.load_abilities(&statuses)?;
        info!(
            data_dir = %self.data_dir.display(),
            statuses = statuses.len(),
            abilities = abilities.len(),
            "content loaded"
        );

        Ok(Content {
            config,
            statuses,
            abilities,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

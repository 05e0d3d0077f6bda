//! Status and ability catalog loaders.

use std::path::Path;

use crate::catalog::{AbilityCatalog, StatusCatalog};
use crate::loaders::{LoadResult, read_file};

/// Loader for status catalogs from RON files.
pub struct StatusLoader;

impl StatusLoader {
    /// Load and validate a status catalog.
    ///
    /// RON format: `(statuses: [StatusSpec, ...])`
    pub fn load(path: &Path) -> LoadResult<StatusCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StatusCatalog> {
        let catalog: StatusCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;
        catalog
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid status catalog: {}", e))?;

        Ok(catalog)
    }
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load an ability catalog and validate it against `statuses`.
    ///
    /// RON format: `(abilities: [AbilitySpec, ...])`
    pub fn load(path: &Path, statuses: &StatusCatalog) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, statuses)
    }

    pub fn parse(content: &str, statuses: &StatusCatalog) -> LoadResult<AbilityCatalog> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;
        catalog
            .validate(statuses)
            .map_err(|e| anyhow::anyhow!("Invalid ability catalog: {}", e))?;

        Ok(catalog)
    }
}

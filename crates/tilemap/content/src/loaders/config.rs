//! Map configuration loader.

use std::path::Path;

use tilemap_core::MapConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`MapConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a map configuration.
    ///
    /// Missing fields fall back to [`MapConfig::default`].
    pub fn load(path: &Path) -> LoadResult<MapConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid map config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MapConfig> {
        let config: MapConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

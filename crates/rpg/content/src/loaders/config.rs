//! Service configuration loader.

use std::path::Path;

use rpg_core::RpgConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`RpgConfig`] from TOML files.
///
/// Every section and field is optional; omitted values keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<RpgConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<RpgConfig> {
        let config: RpgConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

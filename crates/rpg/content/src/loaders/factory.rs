//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use rpg_core::RpgConfig;

use crate::catalog::ItemCatalog;
use crate::loaders::{ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads all content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const ITEMS_FILE: &'static str = "items.ron";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load service configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<RpgConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(RpgConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the item catalog from `items.ron`.
    ///
    /// A missing file yields an empty catalog.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        let path = self.data_dir.join(Self::ITEMS_FILE);
        if !path.exists() {
            return Ok(ItemCatalog::new());
        }
        ItemLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), RpgConfig::default());
        assert!(factory.load_items().unwrap().is_empty());
    }

    #[test]
    fn loads_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "game_seed = 7\n").unwrap();
        std::fs::write(
            dir.path().join("items.ron"),
            r#"(items: [(id: 1, bonuses: {"strength": 2})])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().game_seed, Some(7));
        assert_eq!(factory.load_items().unwrap().len(), 1);
    }
}

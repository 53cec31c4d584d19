//! Item catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use rpg_core::{AbilityLink, ItemHandle, StatBonuses};
use serde::{Deserialize, Serialize};

use crate::catalog::{ItemCatalog, ItemEntry};
use crate::loaders::{LoadResult, read_file};

/// Ability reference as written in item data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityLinkDefinition {
    pub id: String,
    #[serde(default)]
    pub cost: Option<u32>,
}

/// One item as written in the catalog file.
///
/// Bonuses are keyed by stat name (`"strength"`, `"crit_chance"`, ...) so the
/// file stays readable and survives stat reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bonuses: BTreeMap<String, i64>,
    #[serde(default)]
    pub ability: Option<AbilityLinkDefinition>,
}

impl ItemDefinition {
    /// Converts the written form into a catalog entry.
    ///
    /// Unknown stat names are logged and contribute nothing.
    pub fn resolve(&self) -> ItemEntry {
        let mut bonuses = StatBonuses::new();
        for (stat, value) in &self.bonuses {
            if let Err(error) = bonuses.add_named(stat, *value) {
                tracing::warn!(
                    target: "content::items",
                    item = self.id,
                    stat = %stat,
                    %error,
                    "skipping unknown stat bonus"
                );
            }
        }

        let ability = self.ability.as_ref().map(|link| AbilityLink {
            ability: link.id.as_str().into(),
            cost_override: link.cost,
        });

        ItemEntry { bonuses, ability }
    }
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load items {}: {}", path.display(), e))
    }

    /// Parse a catalog from RON text.
    ///
    /// Duplicate ids are logged; the later definition wins.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut catalog = ItemCatalog::new();
        for definition in &file.items {
            let handle = ItemHandle(definition.id);
            if catalog.insert(handle, definition.resolve()).is_some() {
                tracing::warn!(
                    target: "content::items",
                    item = definition.id,
                    "duplicate item definition, keeping the last one"
                );
            }
        }

        tracing::debug!(target: "content::items", count = catalog.len(), "item catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rpg_core::StatKind;

    use super::*;

    const CATALOG: &str = r#"
        (
            items: [
                (
                    id: 1,
                    name: Some("Leaping Sword"),
                    bonuses: { "strength": 15, "speed": 20 },
                    ability: Some((id: "leap", cost: Some(5))),
                ),
                (
                    id: 2,
                    bonuses: { "defense": 40, "luck": 7 },
                ),
            ],
        )
    "#;

    #[test]
    fn parses_bonuses_and_ability_links() {
        let catalog = ItemLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let sword = catalog.bonuses(ItemHandle(1)).unwrap();
        assert_eq!(sword.get(StatKind::Strength), 15);
        assert_eq!(sword.get(StatKind::Speed), 20);

        let link = catalog.ability(ItemHandle(1)).unwrap();
        assert_eq!(link.ability.as_str(), "leap");
        assert_eq!(link.cost_override, Some(5));
    }

    #[test]
    fn unknown_stat_names_are_skipped() {
        let catalog = ItemLoader::parse(CATALOG).unwrap();
        let armor = catalog.bonuses(ItemHandle(2)).unwrap();
        assert_eq!(armor.get(StatKind::Defense), 40);
        assert_eq!(armor.iter().count(), 1);
        assert!(catalog.ability(ItemHandle(2)).is_none());
    }

    #[test]
    fn duplicate_ids_keep_last_definition() {
        let catalog = ItemLoader::parse(
            r#"(items: [(id: 3, bonuses: {"strength": 1}), (id: 3, bonuses: {"strength": 9})])"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.bonuses(ItemHandle(3)).unwrap().get(StatKind::Strength),
            9
        );
    }

    #[test]
    fn rejects_malformed_ron() {
        assert!(ItemLoader::parse("(items: [(id: \"x\")])").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = ItemLoader::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}

//! In-memory item catalog.

use std::collections::HashMap;

use rpg_core::{AbilityLink, ItemHandle, ItemReadError, StatBonuses};

/// Resolved definition of one item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemEntry {
    pub bonuses: StatBonuses,
    pub ability: Option<AbilityLink>,
}

/// Item definitions keyed by handle.
///
/// Answers the two item lookups the runtime needs: declared stat bonuses and
/// the ability an item links to.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemHandle, ItemEntry>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an item.
    pub fn insert(&mut self, item: ItemHandle, entry: ItemEntry) -> Option<ItemEntry> {
        self.items.insert(item, entry)
    }

    pub fn with_item(mut self, item: ItemHandle, entry: ItemEntry) -> Self {
        self.insert(item, entry);
        self
    }

    pub fn get(&self, item: ItemHandle) -> Option<&ItemEntry> {
        self.items.get(&item)
    }

    /// Declared bonuses of `item`. Unknown handles report [`ItemReadError::Missing`].
    pub fn bonuses(&self, item: ItemHandle) -> Result<StatBonuses, ItemReadError> {
        self.items
            .get(&item)
            .map(|entry| entry.bonuses.clone())
            .ok_or(ItemReadError::Missing(item))
    }

    pub fn ability(&self, item: ItemHandle) -> Option<AbilityLink> {
        self.items.get(&item).and_then(|entry| entry.ability.clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(ItemHandle, ItemEntry)> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = (ItemHandle, ItemEntry)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rpg_core::StatKind;

    use super::*;

    #[test]
    fn lookups_answer_registered_items() {
        let sword = ItemHandle(1);
        let catalog = ItemCatalog::new().with_item(
            sword,
            ItemEntry {
                bonuses: StatBonuses::new().with(StatKind::Strength, 15),
                ability: Some(AbilityLink::new("leap").with_cost(5)),
            },
        );

        assert_eq!(catalog.bonuses(sword).unwrap().get(StatKind::Strength), 15);
        assert_eq!(catalog.ability(sword).unwrap().cost_override, Some(5));
    }

    #[test]
    fn unknown_item_is_missing() {
        let catalog = ItemCatalog::new();
        assert_eq!(
            catalog.bonuses(ItemHandle(9)),
            Err(ItemReadError::Missing(ItemHandle(9)))
        );
        assert!(catalog.ability(ItemHandle(9)).is_none());
    }
}

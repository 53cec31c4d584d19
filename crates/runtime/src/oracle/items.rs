//! Equipment and item-ability oracles backed by an [`ItemCatalog`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use rpg_content::ItemCatalog;
use rpg_core::{AbilityLink, ActorId, EquipmentSlot, ItemHandle, ItemReadError, StatBonuses};

use super::{EquipmentOracle, ItemAbilityOracle};

impl ItemAbilityOracle for ItemCatalog {
    fn linked_ability(&self, item: ItemHandle) -> Option<AbilityLink> {
        self.ability(item)
    }
}

/// Per-actor loadouts resolved against a static item catalog.
///
/// Stands in for the host's inventory when running without one (simulations,
/// tests). Equipping replaces whatever the slot held.
pub struct LoadoutOracle {
    catalog: ItemCatalog,
    loadouts: RwLock<HashMap<ActorId, Vec<(EquipmentSlot, ItemHandle)>>>,
}

impl LoadoutOracle {
    pub fn new(catalog: ItemCatalog) -> Self {
        Self {
            catalog,
            loadouts: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Put `item` into `slot`, returning what was there.
    pub fn equip(&self, actor: ActorId, slot: EquipmentSlot, item: ItemHandle) -> Option<ItemHandle> {
        let mut loadouts = self.loadouts.write().unwrap_or_else(PoisonError::into_inner);
        let loadout = loadouts.entry(actor).or_default();
        match loadout.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, item)),
            None => {
                loadout.push((slot, item));
                None
            }
        }
    }

    pub fn unequip(&self, actor: ActorId, slot: EquipmentSlot) -> Option<ItemHandle> {
        let mut loadouts = self.loadouts.write().unwrap_or_else(PoisonError::into_inner);
        let loadout = loadouts.get_mut(&actor)?;
        let index = loadout.iter().position(|(s, _)| *s == slot)?;
        Some(loadout.remove(index).1)
    }

    pub fn clear(&self, actor: ActorId) {
        self.loadouts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&actor);
    }

    /// Item currently held in `slot`.
    pub fn item_in(&self, actor: ActorId, slot: EquipmentSlot) -> Option<ItemHandle> {
        self.loadouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor)?
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, item)| *item)
    }
}

impl EquipmentOracle for LoadoutOracle {
    fn equipped_items(&self, actor: ActorId) -> Vec<(EquipmentSlot, ItemHandle)> {
        self.loadouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor)
            .cloned()
            .unwrap_or_default()
    }

    fn item_bonuses(&self, item: ItemHandle) -> Result<StatBonuses, ItemReadError> {
        self.catalog.bonuses(item)
    }
}

impl ItemAbilityOracle for LoadoutOracle {
    fn linked_ability(&self, item: ItemHandle) -> Option<AbilityLink> {
        self.catalog.ability(item)
    }
}

#[cfg(test)]
mod tests {
    use rpg_content::ItemEntry;
    use rpg_core::StatKind;

    use super::*;

    fn oracle() -> LoadoutOracle {
        LoadoutOracle::new(ItemCatalog::new().with_item(
            ItemHandle(1),
            ItemEntry {
                bonuses: StatBonuses::new().with(StatKind::Strength, 5),
                ability: None,
            },
        ))
    }

    #[test]
    fn equip_replaces_slot_content() {
        let oracle = oracle();
        let actor = ActorId(1);

        assert_eq!(oracle.equip(actor, EquipmentSlot::MainHand, ItemHandle(1)), None);
        assert_eq!(
            oracle.equip(actor, EquipmentSlot::MainHand, ItemHandle(2)),
            Some(ItemHandle(1))
        );
        assert_eq!(oracle.equipped_items(actor).len(), 1);
        assert_eq!(oracle.item_in(actor, EquipmentSlot::MainHand), Some(ItemHandle(2)));
    }

    #[test]
    fn unequip_and_clear() {
        let oracle = oracle();
        let actor = ActorId(1);
        oracle.equip(actor, EquipmentSlot::Helmet, ItemHandle(1));
        oracle.equip(actor, EquipmentSlot::Boots, ItemHandle(1));

        assert_eq!(oracle.unequip(actor, EquipmentSlot::Helmet), Some(ItemHandle(1)));
        assert_eq!(oracle.unequip(actor, EquipmentSlot::Helmet), None);
        oracle.clear(actor);
        assert!(oracle.equipped_items(actor).is_empty());
    }

    #[test]
    fn bonuses_come_from_catalog() {
        let oracle = oracle();
        assert_eq!(
            oracle.item_bonuses(ItemHandle(1)).unwrap().get(StatKind::Strength),
            5
        );
        assert!(oracle.item_bonuses(ItemHandle(9)).is_err());
    }
}

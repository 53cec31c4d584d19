//! Narrow interfaces to the host and its content.
//!
//! The services in this crate never talk to the game host directly. Everything
//! they read (validity, equipment, item links) or push (attributes, visual
//! feedback) goes through one of these traits, injected at build time.
//! No runtime lock is held across these calls, so implementations may call
//! back into the services.

mod actors;
mod items;

use rpg_core::{
    AbilityId, AbilityLink, ActivationResult, ActorId, AttributeSnapshot, EquipmentSlot,
    ItemHandle, ItemReadError, ModifierKey, ResolvedDamage, StatBonuses,
};

pub use actors::ActorRoster;
pub use items::LoadoutOracle;

/// Which actors currently exist on the host.
pub trait ActorDirectory: Send + Sync {
    fn is_valid(&self, actor: ActorId) -> bool;

    /// Every actor whose session is live. Used by the cache sweep.
    fn active_actors(&self) -> Vec<ActorId>;
}

/// Equipped items and the bonuses they declare.
pub trait EquipmentOracle: Send + Sync {
    fn equipped_items(&self, actor: ActorId) -> Vec<(EquipmentSlot, ItemHandle)>;

    fn item_bonuses(&self, item: ItemHandle) -> Result<StatBonuses, ItemReadError>;
}

/// Ability linked from an item's metadata.
pub trait ItemAbilityOracle: Send + Sync {
    fn linked_ability(&self, item: ItemHandle) -> Option<AbilityLink>;
}

/// Host-side attributes mirrored from the snapshot.
pub trait HostSync: Send + Sync {
    fn set_max_health(&self, actor: ActorId, value: i32);

    /// Install or replace the movement-speed modifier identified by `key`.
    fn set_movement_speed_modifier(&self, actor: ActorId, key: ModifierKey, value: f64);
}

/// Fire-and-forget visual feedback.
pub trait DisplaySink: Send + Sync {
    fn damage_resolved(
        &self,
        _attacker: Option<ActorId>,
        _victim: ActorId,
        _damage: &ResolvedDamage,
    ) {
    }

    fn resource_changed(&self, _actor: ActorId, _current: u32, _max: u32) {}

    fn stats_changed(&self, _actor: ActorId, _snapshot: &AttributeSnapshot) {}

    fn activation_rejected(&self, _actor: ActorId, _ability: &AbilityId, _result: &ActivationResult) {
    }
}

/// Display sink that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {}

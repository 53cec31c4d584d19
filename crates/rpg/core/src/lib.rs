//! Deterministic stat model, combat formula and ability contract.
//!
//! `rpg-core` defines the canonical rules shared by the runtime services and
//! offline tools: how base stats and equipment combine into an
//! [`AttributeSnapshot`], how a hit becomes [`ResolvedDamage`], and what an
//! [`Ability`] must expose to be activated. Nothing here performs I/O or keeps
//! state between calls.
pub mod ability;
pub mod combat;
pub mod config;
pub mod error;
pub mod rng;
pub mod stats;
pub mod types;

pub use ability::{
    Ability, AbilityContext, AbilityLink, ActivationPhase, ActivationResult, CooldownEntry,
    Trigger, scaled_cooldown_ticks,
};
pub use combat::{
    DamageCause, DirectHit, ResolvedDamage, WeaponFlags, resolve_direct_hit,
    resolve_environmental_hit,
};
pub use config::{AiConfig, CombatConfig, ResourceConfig, RpgConfig, StatConfig};
pub use error::{AbilityError, ErrorSeverity, GameError, ItemReadError, StatError};
pub use rng::{FixedRoll, PcgRng, RngOracle, compute_seed};
pub use stats::{
    AttributeSnapshot, BaseProfile, ModifierKey, ModifierKind, StatBonuses, StatKind,
};
pub use types::{AbilityId, ActorId, EquipmentSlot, InputAction, ItemHandle, Tick};

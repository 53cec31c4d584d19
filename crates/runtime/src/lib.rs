//! Stateful services for the stat, ability and combat core.
//!
//! This crate wires the pure rules from `rpg-core` to the host through narrow
//! collaborator traits. Consumers build an [`RpgRuntime`], forward host events
//! to it and call [`RpgRuntime::tick`] at the host's fixed rate.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the facade and builder
//! - [`stats`] owns the snapshot cache and debounced recompute
//! - [`resources`] owns mana pools
//! - [`abilities`] gates ability activation
//! - [`combat`] resolves hits by actor id
//! - [`ai`] drives behavior schedulers for non-player actors
//! - [`oracle`] and [`repository`] define what the host provides
pub mod abilities;
pub mod ai;
pub mod api;
pub mod combat;
pub mod oracle;
pub mod repository;
pub mod resources;
pub mod runtime;
pub mod scheduler;
pub mod stats;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use abilities::{AbilityActivationCoordinator, AbilityRegistry};
pub use ai::{ActorScheduler, AiContext, AiRegistry, AiTickSummary};
pub use api::{Result, RuntimeError};
pub use combat::CombatService;
pub use oracle::{
    ActorDirectory, ActorRoster, DisplaySink, EquipmentOracle, HostSync, ItemAbilityOracle,
    LoadoutOracle, NullDisplay,
};
pub use repository::{FileProfileRepo, InMemoryProfileRepo, ProfileRepository, RepositoryError};
pub use resources::{ManaState, ResourcePool};
pub use runtime::{RpgRuntime, RpgRuntimeBuilder, TickSummary};
pub use scheduler::DebounceQueue;
pub use stats::StatAggregator;

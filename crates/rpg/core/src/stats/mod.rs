//! Stat system.
//!
//! ```text
//! [ BaseProfile (persisted) ]   [ StatBonuses (equipment, per pass) ]
//!              \                   /
//!               ↓                 ↓
//!        [ AttributeSnapshot (clamped, immutable) ]
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: only the base profile is stored
//! 2. **Clamp once**: bounds are enforced when a snapshot is built, never later
//! 3. **Replace, never edit**: a stat change yields a new snapshot

pub mod bonus;
pub mod kind;
pub mod modifier_key;
pub mod profile;
pub mod snapshot;

pub use bonus::StatBonuses;
pub use kind::{StatBounds, StatKind};
pub use modifier_key::{ModifierKey, ModifierKind};
pub use profile::BaseProfile;
pub use snapshot::{AttributeSnapshot, SnapshotBuilder};

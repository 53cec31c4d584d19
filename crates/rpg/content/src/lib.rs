//! Data-driven content definitions and loaders.
//!
//! This crate turns data files into the values the runtime consumes:
//! - Item catalogs (RON): per-item stat bonuses and linked abilities
//! - Service configuration (TOML): [`rpg_core::RpgConfig`]
//!
//! Content is read once at startup and answered from memory afterwards.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{ItemCatalog, ItemEntry};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ItemDefinition, ItemLoader, LoadResult};

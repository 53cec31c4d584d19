//! Repository layer for persisted actor data.
//!
//! Repositories handle data that CHANGES during gameplay and must survive a
//! session: the base profile. Static content (items, abilities) is handled by
//! oracles, not repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileProfileRepo;
pub use memory::InMemoryProfileRepo;
pub use traits::ProfileRepository;

//! Repository contract for the persisted base profile.

use rpg_core::{ActorId, BaseProfile};

use crate::repository::Result;

/// Storage for per-actor base stats.
///
/// This is the only DYNAMIC data the core persists. Equipment and item
/// definitions are read through oracles, never stored here.
pub trait ProfileRepository: Send + Sync {
    /// Load an actor's profile. `Ok(None)` means the actor has none yet.
    fn load(&self, actor: ActorId) -> Result<Option<BaseProfile>>;

    fn save(&self, actor: ActorId, profile: &BaseProfile) -> Result<()>;

    fn exists(&self, actor: ActorId) -> bool {
        matches!(self.load(actor), Ok(Some(_)))
    }

    fn delete(&self, actor: ActorId) -> Result<()>;
}

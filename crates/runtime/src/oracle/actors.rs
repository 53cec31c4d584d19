//! Minimal [`ActorDirectory`] backed by an in-memory set.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use rpg_core::ActorId;

use super::ActorDirectory;

/// Actor set maintained by the host as actors spawn and despawn.
#[derive(Debug, Default)]
pub struct ActorRoster {
    actors: RwLock<BTreeSet<ActorId>>,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actors(actors: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            actors: RwLock::new(actors.into_iter().collect()),
        }
    }

    /// Returns `false` if the actor was already present.
    pub fn insert(&self, actor: ActorId) -> bool {
        self.actors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor)
    }

    pub fn remove(&self, actor: ActorId) -> bool {
        self.actors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&actor)
    }
}

impl ActorDirectory for ActorRoster {
    fn is_valid(&self, actor: ActorId) -> bool {
        self.actors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&actor)
    }

    fn active_actors(&self) -> Vec<ActorId> {
        self.actors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}

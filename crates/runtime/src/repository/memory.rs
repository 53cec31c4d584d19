//! In-memory ProfileRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use rpg_core::{ActorId, BaseProfile};

use crate::repository::{ProfileRepository, RepositoryError, Result};

/// In-memory implementation of ProfileRepository.
pub struct InMemoryProfileRepo {
    profiles: RwLock<HashMap<ActorId, BaseProfile>>,
}

impl InMemoryProfileRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Create with a set of stored profiles.
    pub fn with_profiles(profiles: impl IntoIterator<Item = (ActorId, BaseProfile)>) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .map(|profiles| profiles.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryProfileRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRepository for InMemoryProfileRepo {
    fn load(&self, actor: ActorId) -> Result<Option<BaseProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(profiles.get(&actor).cloned())
    }

    fn save(&self, actor: ActorId, profile: &BaseProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.insert(actor, profile.clone());
        Ok(())
    }

    fn exists(&self, actor: ActorId) -> bool {
        self.profiles
            .read()
            .map(|profiles| profiles.contains_key(&actor))
            .unwrap_or(false)
    }

    fn delete(&self, actor: ActorId) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.remove(&actor);
        Ok(())
    }
}

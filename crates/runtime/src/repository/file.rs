//! File-based ProfileRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use rpg_core::{ActorId, BaseProfile};

use crate::repository::{ProfileRepository, RepositoryError, Result};

/// File-based implementation of ProfileRepository.
///
/// # File Format
///
/// Each profile is stored as `profile_{actor}.json`, a flat JSON object of
/// stat names to base values. Fields missing from an older file read as
/// their defaults.
pub struct FileProfileRepo {
    base_dir: PathBuf,
}

impl FileProfileRepo {
    /// Create a new file-based repository rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn profile_path(&self, actor: ActorId) -> PathBuf {
        self.base_dir.join(format!("profile_{}.json", actor.0))
    }

    /// List actors with a stored profile.
    pub fn list_actors(&self) -> Result<Vec<ActorId>> {
        let mut actors = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("profile_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id.parse::<u64>()
            {
                actors.push(ActorId(id));
            }
        }

        actors.sort_unstable();
        Ok(actors)
    }
}

impl ProfileRepository for FileProfileRepo {
    fn load(&self, actor: ActorId) -> Result<Option<BaseProfile>> {
        let path = self.profile_path(actor);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let profile: BaseProfile = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(target: "runtime::repository", actor = %actor, "loaded profile");
        Ok(Some(profile))
    }

    fn save(&self, actor: ActorId, profile: &BaseProfile) -> Result<()> {
        let path = self.profile_path(actor);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(profile)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(target: "runtime::repository", actor = %actor, path = %path.display(), "saved profile");
        Ok(())
    }

    fn exists(&self, actor: ActorId) -> bool {
        self.profile_path(actor).exists()
    }

    fn delete(&self, actor: ActorId) -> Result<()> {
        let path = self.profile_path(actor);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(target: "runtime::repository", actor = %actor, "deleted profile");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rpg_core::StatKind;

    use super::*;

    #[test]
    fn profiles_survive_a_new_repository_instance() {
        let dir = tempfile::tempdir().unwrap();
        let profile = BaseProfile::default()
            .with(StatKind::Defense, 25)
            .with(StatKind::MaxMana, 100);

        FileProfileRepo::new(dir.path())
            .unwrap()
            .save(ActorId(7), &profile)
            .unwrap();

        let reopened = FileProfileRepo::new(dir.path()).unwrap();
        assert_eq!(reopened.load(ActorId(7)).unwrap(), Some(profile));
        assert_eq!(reopened.list_actors().unwrap(), vec![ActorId(7)]);
    }

    #[test]
    fn missing_profile_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProfileRepo::new(dir.path()).unwrap();
        assert_eq!(repo.load(ActorId(1)).unwrap(), None);
        assert!(!repo.exists(ActorId(1)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProfileRepo::new(dir.path()).unwrap();
        fs::write(dir.path().join("profile_3.json"), r#"{ "strength": 4 }"#).unwrap();

        let profile = repo.load(ActorId(3)).unwrap().unwrap();
        assert_eq!(profile.strength, 4);
        assert_eq!(profile.max_health, 1);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProfileRepo::new(dir.path()).unwrap();
        fs::write(dir.path().join("profile_3.json"), "not json").unwrap();

        assert!(matches!(
            repo.load(ActorId(3)),
            Err(RepositoryError::CorruptedData(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProfileRepo::new(dir.path()).unwrap();
        repo.save(ActorId(1), &BaseProfile::default()).unwrap();

        repo.delete(ActorId(1)).unwrap();
        repo.delete(ActorId(1)).unwrap();
        assert!(repo.list_actors().unwrap().is_empty());
    }
}

//! Unified error types surfaced by the runtime API.
//!
//! Wraps repository failures and builder misconfiguration. Gameplay outcomes
//! (cooldowns, missing mana, declined abilities) are reported through
//! [`rpg_core::ActivationResult`], never as errors.

use rpg_core::{ActorId, ErrorSeverity, GameError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("runtime requires {0} to be configured before building")]
    MissingCollaborator(&'static str),

    #[error("actor {0} is not known to the host")]
    UnknownActor(ActorId),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Repository(RepositoryError::LockPoisoned) => ErrorSeverity::Fatal,
            Self::Repository(_) => ErrorSeverity::Internal,
            Self::MissingCollaborator(_) => ErrorSeverity::Fatal,
            Self::UnknownActor(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::MissingCollaborator(_) => "RUNTIME_MISSING_COLLABORATOR",
            Self::UnknownActor(_) => "RUNTIME_UNKNOWN_ACTOR",
        }
    }
}

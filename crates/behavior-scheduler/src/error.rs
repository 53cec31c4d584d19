//! Errors raised from behavior callbacks.

use thiserror::Error;

use crate::CallbackPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BehaviorError {
    /// The behavior's target (entity, block, ...) disappeared.
    #[error("target lost: {0}")]
    TargetLost(String),

    /// Any other failure reported by the behavior itself.
    #[error("{0}")]
    Failed(String),

    /// A callback panicked; recorded by the scheduler, never returned by user code.
    #[error("behavior `{behavior}` panicked during {phase}: {message}")]
    Panicked {
        behavior: &'static str,
        phase: CallbackPhase,
        message: String,
    },
}

impl BehaviorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

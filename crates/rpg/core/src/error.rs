//! Common error infrastructure for rpg-core.
//!
//! The stat and combat layers degrade to safe defaults instead of failing, so
//! the error types here describe *why* a fallback happened. Callers log them
//! and continue; only the ability boundary surfaces them as an outcome.

use crate::types::{AbilityId, ItemHandle};

/// Severity level of an error, used for logging priority and recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition, a later attempt may succeed.
    Recoverable,

    /// Invalid definition or input, retrying without changes will not help.
    Validation,

    /// Unexpected failure inside third-party or host code.
    Internal,

    /// Unrecoverable state corruption.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all rpg-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Stat-definition errors. Always answered with a zero contribution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("unknown stat name `{0}`")]
    UnknownStat(String),

    #[error("stat `{stat}` has non-finite or out-of-range bonus {value}")]
    MalformedBonus { stat: String, value: i64 },
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStat(_) => "STAT_UNKNOWN",
            Self::MalformedBonus { .. } => "STAT_MALFORMED_BONUS",
        }
    }
}

/// Raised by the equipment collaborator when an item cannot be read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemReadError {
    #[error("item {0} no longer exists")]
    Missing(ItemHandle),

    #[error("item {item} has malformed metadata: {reason}")]
    Malformed { item: ItemHandle, reason: String },

    #[error(transparent)]
    Stat(#[from] StatError),
}

impl GameError for ItemReadError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Missing(_) => ErrorSeverity::Recoverable,
            Self::Malformed { .. } | Self::Stat(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "ITEM_MISSING",
            Self::Malformed { .. } => "ITEM_MALFORMED",
            Self::Stat(inner) => inner.error_code(),
        }
    }
}

/// Failure raised from inside an ability's own hooks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("ability `{ability}` failed: {reason}")]
    Execution { ability: AbilityId, reason: String },

    #[error("ability `{ability}` panicked: {message}")]
    Panicked { ability: AbilityId, message: String },

    #[error("unknown ability `{0}`")]
    Unknown(AbilityId),
}

impl AbilityError {
    pub fn execution(ability: &AbilityId, reason: impl Into<String>) -> Self {
        Self::Execution {
            ability: ability.clone(),
            reason: reason.into(),
        }
    }
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Execution { .. } | Self::Panicked { .. } => ErrorSeverity::Internal,
            Self::Unknown(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Execution { .. } => "ABILITY_EXECUTION_FAILED",
            Self::Panicked { .. } => "ABILITY_PANICKED",
            Self::Unknown(_) => "ABILITY_UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_error_codes_delegate_to_stat_errors() {
        let err = ItemReadError::from(StatError::UnknownStat("luck".into()));
        assert_eq!(err.error_code(), "STAT_UNKNOWN");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn ability_failures_are_internal() {
        let err = AbilityError::execution(&AbilityId::from("leap"), "no target");
        assert!(err.severity().is_internal());
        assert_eq!(err.to_string(), "ability `leap` failed: no target");
    }
}

//! Errors raised while turning content definitions into core objects.

use skirmish_core::{AbilityError, ErrorSeverity, GameError, StatusError};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("unknown status `{0}`")]
    UnknownStatus(String),

    #[error("unknown ability `{0}`")]
    UnknownAbility(String),

    #[error("{kind} `{name}` is defined more than once")]
    Duplicate { kind: &'static str, name: String },

    #[error("`{owner}`: {reason}")]
    InvalidParameter { owner: String, reason: String },

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Ability(#[from] AbilityError),
}

impl ContentError {
    pub(crate) fn invalid(owner: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            owner: owner.to_owned(),
            reason: reason.into(),
        }
    }
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Status(err) => err.severity(),
            Self::Ability(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStatus(_) => "CONTENT_UNKNOWN_STATUS",
            Self::UnknownAbility(_) => "CONTENT_UNKNOWN_ABILITY",
            Self::Duplicate { .. } => "CONTENT_DUPLICATE",
            Self::InvalidParameter { .. } => "CONTENT_INVALID_PARAMETER",
            Self::Status(err) => err.error_code(),
            Self::Ability(err) => err.error_code(),
        }
    }
}

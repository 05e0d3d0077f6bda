//! Host-level errors.

use skirmish_core::{ControllerError, EntityId, ErrorSeverity, GameError};

use crate::simulation::BulletId;

/// Errors raised by [`Simulation`](crate::Simulation) calls.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),

    #[error("no bullet with id {0}")]
    UnknownBullet(BulletId),

    #[error("entity {0} is already spawned")]
    DuplicateEntity(EntityId),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl GameError for SimulationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Controller(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "SIMULATION_UNKNOWN_ENTITY",
            Self::UnknownBullet(_) => "SIMULATION_UNKNOWN_BULLET",
            Self::DuplicateEntity(_) => "SIMULATION_DUPLICATE_ENTITY",
            Self::Controller(err) => err.error_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

//! State invariant errors.
//!
//! Raised by post-validation when a command left the world in a shape the
//! rules never allow. A correct engine never produces these.

use crate::error::{ErrorSeverity, GameError};
use crate::env::OracleError;
use crate::state::{TerritoryId, UnitId, UnitKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("unit id space exhausted")]
    UnitIdOverflow,

    #[error("no faction is active")]
    NoActiveFaction,

    #[error("{carrier} ({kind}) holds an illegal cargo load")]
    IllegalCargo { carrier: UnitId, kind: UnitKind },

    #[error("{unit} has {movement} movement left, above its allowance of {allowance}")]
    MovementAboveAllowance {
        unit: UnitId,
        movement: u32,
        allowance: u32,
    },

    #[error("{unit} appears more than once in the world")]
    DuplicateUnit { unit: UnitId },

    #[error("territory '{0}' is missing from the world state")]
    MissingTerritory(TerritoryId),

    #[error("more than one battle is awaiting casualty selection")]
    ConcurrentCasualtySelection,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::Oracle(error) => error.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            UnitIdOverflow => "STATE_UNIT_ID_OVERFLOW",
            NoActiveFaction => "STATE_NO_ACTIVE_FACTION",
            IllegalCargo { .. } => "STATE_ILLEGAL_CARGO",
            MovementAboveAllowance { .. } => "STATE_MOVEMENT_ABOVE_ALLOWANCE",
            DuplicateUnit { .. } => "STATE_DUPLICATE_UNIT",
            MissingTerritory(_) => "STATE_MISSING_TERRITORY",
            ConcurrentCasualtySelection => "STATE_CONCURRENT_CASUALTY_SELECTION",
            Oracle(error) => error.error_code(),
        }
    }
}

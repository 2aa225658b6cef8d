//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitKind;

/// Errors that occur when accessing reference data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("TerritoryOracle not available")]
    TerritoriesNotAvailable,

    #[error("UnitOracle not available")]
    UnitsNotAvailable,

    #[error("ConfigOracle not available")]
    ConfigNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    /// The command named a territory the reference data does not know.
    #[error("unknown territory '{0}'")]
    UnknownTerritory(String),

    #[error("no stats for unit type {0}")]
    MissingUnitStats(UnitKind),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            UnknownTerritory(_) => ErrorSeverity::Malformed,
            TerritoriesNotAvailable | UnitsNotAvailable | ConfigNotAvailable | RngNotAvailable
            | MissingUnitStats(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            TerritoriesNotAvailable => "ORACLE_TERRITORIES_NOT_AVAILABLE",
            UnitsNotAvailable => "ORACLE_UNITS_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            UnknownTerritory(_) => "ORACLE_UNKNOWN_TERRITORY",
            MissingUnitStats(_) => "ORACLE_MISSING_UNIT_STATS",
        }
    }
}

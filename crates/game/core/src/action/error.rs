//! Command validation errors.
//!
//! One enum per command family. Variants that point at data the caller made
//! up (unknown ids, empty selections) are `Malformed`; everything else is a
//! `RuleViolation` unless it wraps an internal failure.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleKey, Faction, ProductionItem, StateError, TerritoryId, UnitId};

// ============================================================================
// Movement, loading, unloading
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("no units selected")]
    EmptySelection,

    #[error("{0} selected more than once")]
    DuplicateUnit(UnitId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: TerritoryId, to: TerritoryId },

    #[error("{unit} is not in {territory}")]
    UnitNotInTerritory { unit: UnitId, territory: TerritoryId },

    #[error("{unit} does not belong to {faction}")]
    NotOwned { unit: UnitId, faction: Faction },

    #[error("{unit} has no movement left")]
    NoMovementLeft { unit: UnitId },

    #[error("land unit {unit} cannot enter ocean {territory}")]
    LandUnitAtSea { unit: UnitId, territory: TerritoryId },

    #[error("sea unit {unit} cannot enter land territory {territory}")]
    SeaUnitOnLand { unit: UnitId, territory: TerritoryId },

    #[error("{0} is neutral and cannot be entered")]
    NeutralTerritory(TerritoryId),

    #[error("anti-aircraft unit {unit} may only move during non-combat movement")]
    AntiAircraftInCombatMove { unit: UnitId },

    #[error("anti-aircraft unit {unit} already fired this turn")]
    AntiAircraftAlreadyFired { unit: UnitId },

    #[error("{unit} cannot enter hostile {territory} during non-combat movement")]
    HostileEntryForbidden { unit: UnitId, territory: TerritoryId },

    #[error("{territory} holds hostile units; tanks may only enter uncontested territory")]
    ContestedEntryForbidden { unit: UnitId, territory: TerritoryId },

    #[error("{0} is not an ocean territory")]
    NotOcean(TerritoryId),

    #[error("{0} is not a land territory")]
    NotLand(TerritoryId),

    #[error("{unit} cannot carry land units")]
    NotATransport { unit: UnitId },

    #[error("{unit} is not a land unit and cannot be loaded")]
    NotLoadable { unit: UnitId },

    #[error("transport {transport} has no room for the selected units")]
    CargoCapacity { transport: UnitId },

    #[error("{unit} is not aboard transport {transport}")]
    NotAboard { unit: UnitId, transport: UnitId },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        use MoveError::*;
        match self {
            EmptySelection | DuplicateUnit(_) | UnknownUnit(_) => ErrorSeverity::Malformed,
            Oracle(error) => error.severity(),
            State(error) => error.severity(),
            _ => ErrorSeverity::RuleViolation,
        }
    }

    fn error_code(&self) -> &'static str {
        use MoveError::*;
        match self {
            EmptySelection => "MOVE_EMPTY_SELECTION",
            DuplicateUnit(_) => "MOVE_DUPLICATE_UNIT",
            UnknownUnit(_) => "MOVE_UNKNOWN_UNIT",
            NotAdjacent { .. } => "MOVE_NOT_ADJACENT",
            UnitNotInTerritory { .. } => "MOVE_UNIT_NOT_IN_TERRITORY",
            NotOwned { .. } => "MOVE_NOT_OWNED",
            NoMovementLeft { .. } => "MOVE_NO_MOVEMENT_LEFT",
            LandUnitAtSea { .. } => "MOVE_LAND_UNIT_AT_SEA",
            SeaUnitOnLand { .. } => "MOVE_SEA_UNIT_ON_LAND",
            NeutralTerritory(_) => "MOVE_NEUTRAL_TERRITORY",
            AntiAircraftInCombatMove { .. } => "MOVE_ANTI_AIRCRAFT_IN_COMBAT_MOVE",
            AntiAircraftAlreadyFired { .. } => "MOVE_ANTI_AIRCRAFT_ALREADY_FIRED",
            HostileEntryForbidden { .. } => "MOVE_HOSTILE_ENTRY_FORBIDDEN",
            ContestedEntryForbidden { .. } => "MOVE_CONTESTED_ENTRY_FORBIDDEN",
            NotOcean(_) => "MOVE_NOT_OCEAN",
            NotLand(_) => "MOVE_NOT_LAND",
            NotATransport { .. } => "MOVE_NOT_A_TRANSPORT",
            NotLoadable { .. } => "MOVE_NOT_LOADABLE",
            CargoCapacity { .. } => "MOVE_CARGO_CAPACITY",
            NotAboard { .. } => "MOVE_NOT_ABOARD",
            Oracle(error) => error.error_code(),
            State(error) => error.error_code(),
        }
    }
}

// ============================================================================
// Purchase and mobilization
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductionError {
    #[error("nothing to mobilize")]
    EmptySelection,

    #[error("{faction} has no player record")]
    UnknownPlayer { faction: Faction },

    #[error("{item} costs {cost} IPCs but only {available} are available")]
    InsufficientIpcs {
        item: ProductionItem,
        cost: u32,
        available: u32,
    },

    #[error(
        "cannot buy another industrial complex: {controlled} territories, {owned} owned and {queued} queued"
    )]
    IndustrialComplexLimit {
        controlled: usize,
        owned: usize,
        queued: usize,
    },

    #[error("{0} is not waiting for mobilization")]
    NotPurchased(ProductionItem),

    #[error("{0} is not controlled by the mobilizing faction")]
    NotControlled(TerritoryId),

    #[error("{0} has no industrial complex")]
    NoFactory(TerritoryId),

    #[error("{0} already has an industrial complex")]
    FactoryAlreadyPresent(TerritoryId),

    #[error("{0} does not border a controlled industrial complex")]
    NoAdjacentFactory(TerritoryId),

    #[error("{item} cannot be placed in {territory}")]
    WrongTerrain {
        item: ProductionItem,
        territory: TerritoryId,
    },

    #[error("no carrier space for air units in {0}")]
    NoCarrierCapacity(TerritoryId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for ProductionError {
    fn severity(&self) -> ErrorSeverity {
        use ProductionError::*;
        match self {
            EmptySelection => ErrorSeverity::Malformed,
            UnknownPlayer { .. } => ErrorSeverity::Internal,
            Oracle(error) => error.severity(),
            State(error) => error.severity(),
            _ => ErrorSeverity::RuleViolation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ProductionError::*;
        match self {
            EmptySelection => "PRODUCTION_EMPTY_SELECTION",
            UnknownPlayer { .. } => "PRODUCTION_UNKNOWN_PLAYER",
            InsufficientIpcs { .. } => "PRODUCTION_INSUFFICIENT_IPCS",
            IndustrialComplexLimit { .. } => "PRODUCTION_INDUSTRIAL_COMPLEX_LIMIT",
            NotPurchased(_) => "PRODUCTION_NOT_PURCHASED",
            NotControlled(_) => "PRODUCTION_NOT_CONTROLLED",
            NoFactory(_) => "PRODUCTION_NO_FACTORY",
            FactoryAlreadyPresent(_) => "PRODUCTION_FACTORY_ALREADY_PRESENT",
            NoAdjacentFactory(_) => "PRODUCTION_NO_ADJACENT_FACTORY",
            WrongTerrain { .. } => "PRODUCTION_WRONG_TERRAIN",
            NoCarrierCapacity(_) => "PRODUCTION_NO_CARRIER_CAPACITY",
            Oracle(error) => error.error_code(),
            State(error) => error.error_code(),
        }
    }
}

// ============================================================================
// Combat
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("no {0}")]
    UnknownBattle(BattleKey),

    #[error("{key} was declared by {attacker}")]
    NotAttacker { key: BattleKey, attacker: Faction },

    #[error("{0} is already resolved")]
    AlreadyResolved(BattleKey),

    #[error("{0} is waiting for casualty selection")]
    AwaitingCasualties(BattleKey),

    #[error("{0} is not waiting for casualty selection")]
    NotAwaitingCasualties(BattleKey),

    #[error("{0} must finish casualty selection first")]
    OtherBattleAwaitingCasualties(BattleKey),

    #[error("{0} is already being resolved")]
    OtherBattleInProgress(BattleKey),

    #[error("{0} must be resolved first")]
    BlockedBy(BattleKey),

    #[error("expected {expected} casualties, got {selected}")]
    WrongCasualtyCount { expected: u32, selected: u32 },

    #[error("{0} cannot be taken as a casualty here")]
    InvalidCasualty(UnitId),

    #[error("retreat is only possible after the first round")]
    RetreatBeforeFirstRound,

    #[error("anti-aircraft fire cannot be retreated from")]
    RetreatFromAntiAircraft,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            UnknownBattle(_) => ErrorSeverity::Malformed,
            Oracle(error) => error.severity(),
            State(error) => error.severity(),
            _ => ErrorSeverity::RuleViolation,
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            UnknownBattle(_) => "COMBAT_UNKNOWN_BATTLE",
            NotAttacker { .. } => "COMBAT_NOT_ATTACKER",
            AlreadyResolved(_) => "COMBAT_ALREADY_RESOLVED",
            AwaitingCasualties(_) => "COMBAT_AWAITING_CASUALTIES",
            NotAwaitingCasualties(_) => "COMBAT_NOT_AWAITING_CASUALTIES",
            OtherBattleAwaitingCasualties(_) => "COMBAT_OTHER_BATTLE_AWAITING_CASUALTIES",
            OtherBattleInProgress(_) => "COMBAT_OTHER_BATTLE_IN_PROGRESS",
            BlockedBy(_) => "COMBAT_BLOCKED",
            WrongCasualtyCount { .. } => "COMBAT_WRONG_CASUALTY_COUNT",
            InvalidCasualty(_) => "COMBAT_INVALID_CASUALTY",
            RetreatBeforeFirstRound => "COMBAT_RETREAT_BEFORE_FIRST_ROUND",
            RetreatFromAntiAircraft => "COMBAT_RETREAT_FROM_ANTI_AIRCRAFT",
            Oracle(error) => error.error_code(),
            State(error) => error.error_code(),
        }
    }
}

// ============================================================================
// Phase and turn lifecycle
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseError {
    #[error("{0} battle(s) are still unresolved")]
    UnresolvedBattles(usize),

    #[error("no checkpoint to restore for this phase")]
    NoCheckpoint,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PhaseError::UnresolvedBattles(_) | PhaseError::NoCheckpoint => {
                ErrorSeverity::RuleViolation
            }
            PhaseError::Oracle(error) => error.severity(),
            PhaseError::State(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PhaseError::UnresolvedBattles(_) => "PHASE_UNRESOLVED_BATTLES",
            PhaseError::NoCheckpoint => "PHASE_NO_CHECKPOINT",
            PhaseError::Oracle(error) => error.error_code(),
            PhaseError::State(error) => error.error_code(),
        }
    }
}

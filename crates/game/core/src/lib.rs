//! Deterministic rules engine for a five-faction territorial wargame.
//!
//! `conquest-core` defines the canonical rules (commands, combat, turn
//! lifecycle, world state) as pure functions of a [`GameState`] and a
//! read-only [`Env`] of reference data. All state mutation flows through
//! [`engine::GameEngine`]; it performs no I/O and installs no logging
//! subscriber.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    Arrival, CombatError, Command, CommandKind, CommandTransition, EndPhase, EndTurn,
    FireCombatRound, LoadTransport, MobilizeUnits, MoveError, MoveUnits, PhaseChange, PhaseError,
    ProductionError, PurchaseUnit, Purchased, Retreat, SelectCasualties, UndoPhase,
    UnloadTransport,
};
pub use combat::{CombatReport, RetreatReport, Volley};
pub use config::GameConfig;
pub use engine::{
    CommandOutcome, ExecuteError, GameEngine, TransitionPhase, TransitionPhaseError, TurnSummary,
};
pub use env::{
    ConfigOracle, Env, GameEnv, OracleError, OracleSnapshot, PcgRng, RngOracle,
    SnapshotConfigOracle, SnapshotTerritoryOracle, SnapshotUnitOracle, StartingUnits,
    TerritoryInfo, TerritoryOracle, UnitOracle, UnitStats,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    Alliance, Battle, BattleKey, BattleKind, BattleOutcome, BattleTag, CombatStatus, Faction,
    GameState, Phase, PlayerState, ProductionItem, StateError, TerritoryId, TerritoryState,
    TurnState, Unit, UnitId, UnitKind, UnitLocation, UnitTraits,
};

pub mod battle;
pub mod common;
pub mod player;
pub mod territory;
pub mod turn;
pub mod unit;

pub use battle::{
    AaFireBattle, AaStatus, Battle, BattleKey, BattleKind, BattleOutcome, BattleTag,
    CombatStatus, FireStage, Landing, OrdinaryBattle, RoundRolls,
};
pub use common::{Alliance, Faction, TerritoryId, UnitId};
pub use player::PlayerState;
pub use territory::TerritoryState;
pub use turn::{Phase, TurnState};
pub use unit::{Cargo, Passenger, ProductionItem, Unit, UnitKind, UnitTraits};

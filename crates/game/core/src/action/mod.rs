//! Player commands.
//!
//! Every command is a small struct implementing [`CommandTransition`]. The
//! [`Command`] enum is the wire-level surface the engine dispatches on, and
//! [`CommandKind`] carries the phase table that decides when each command
//! may be issued.
//!
//! # Module Structure
//!
//! - `error`: one error enum per command family
//! - `transition`: the three-stage command trait
//! - `purchase`, `mobilize`: production
//! - `movement`, `transport`: map movement and the shared entry rules
//! - `combat`: battle commands
//! - `phase`: turn lifecycle commands

pub mod combat;
pub mod error;
pub mod mobilize;
pub mod movement;
pub mod phase;
pub mod purchase;
pub mod transition;
pub mod transport;

pub use combat::{FireCombatRound, Retreat, SelectCasualties};
pub use error::{CombatError, MoveError, PhaseError, ProductionError};
pub use mobilize::MobilizeUnits;
pub use movement::{Arrival, MoveUnits};
pub use phase::{EndPhase, EndTurn, PhaseChange, UndoPhase};
pub use purchase::{PurchaseUnit, Purchased};
pub use transition::CommandTransition;
pub use transport::{LoadTransport, UnloadTransport};

use crate::state::Phase;

/// One player request. Each call to the engine applies exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "command", rename_all = "snake_case"))]
pub enum Command {
    PurchaseUnit(PurchaseUnit),
    MoveUnits(MoveUnits),
    LoadTransport(LoadTransport),
    UnloadTransport(UnloadTransport),
    FireCombatRound(FireCombatRound),
    SelectCasualties(SelectCasualties),
    Retreat(Retreat),
    MobilizeUnits(MobilizeUnits),
    EndPhase,
    EndTurn,
    UndoPhase,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::PurchaseUnit(_) => CommandKind::PurchaseUnit,
            Command::MoveUnits(_) => CommandKind::MoveUnits,
            Command::LoadTransport(_) => CommandKind::LoadTransport,
            Command::UnloadTransport(_) => CommandKind::UnloadTransport,
            Command::FireCombatRound(_) => CommandKind::FireCombatRound,
            Command::SelectCasualties(_) => CommandKind::SelectCasualties,
            Command::Retreat(_) => CommandKind::Retreat,
            Command::MobilizeUnits(_) => CommandKind::MobilizeUnits,
            Command::EndPhase => CommandKind::EndPhase,
            Command::EndTurn => CommandKind::EndTurn,
            Command::UndoPhase => CommandKind::UndoPhase,
        }
    }
}

/// Command discriminant, used for phase gating and logging.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandKind {
    PurchaseUnit,
    MoveUnits,
    LoadTransport,
    UnloadTransport,
    FireCombatRound,
    SelectCasualties,
    Retreat,
    MobilizeUnits,
    EndPhase,
    EndTurn,
    UndoPhase,
}

impl CommandKind {
    /// Whether the command may be issued during `phase`.
    pub const fn allowed_in(self, phase: Phase) -> bool {
        match self {
            CommandKind::PurchaseUnit => matches!(phase, Phase::Purchase),
            CommandKind::MoveUnits
            | CommandKind::LoadTransport
            | CommandKind::UnloadTransport
            | CommandKind::UndoPhase => phase.is_movement(),
            CommandKind::FireCombatRound
            | CommandKind::SelectCasualties
            | CommandKind::Retreat => matches!(phase, Phase::Combat),
            CommandKind::MobilizeUnits | CommandKind::EndTurn => matches!(phase, Phase::Mobilize),
            CommandKind::EndPhase => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn end_phase_is_always_allowed() {
        for phase in [
            Phase::Purchase,
            Phase::CombatMove,
            Phase::Combat,
            Phase::NonCombatMove,
            Phase::Mobilize,
        ] {
            assert!(CommandKind::EndPhase.allowed_in(phase));
        }
    }

    #[test]
    fn every_other_command_has_a_home_phase() {
        for kind in CommandKind::iter().filter(|kind| *kind != CommandKind::EndPhase) {
            let phases = [
                Phase::Purchase,
                Phase::CombatMove,
                Phase::Combat,
                Phase::NonCombatMove,
                Phase::Mobilize,
            ];
            let allowed = phases.iter().filter(|phase| kind.allowed_in(**phase)).count();
            assert!((1..=2).contains(&allowed), "{kind} allowed in {allowed} phases");
        }
    }

    #[test]
    fn movement_commands_share_both_movement_phases() {
        assert!(CommandKind::LoadTransport.allowed_in(Phase::CombatMove));
        assert!(CommandKind::UnloadTransport.allowed_in(Phase::NonCombatMove));
        assert!(!CommandKind::MoveUnits.allowed_in(Phase::Combat));
        assert!(!CommandKind::Retreat.allowed_in(Phase::NonCombatMove));
    }

    #[test]
    fn command_kind_parses_from_snake_case() {
        assert_eq!(
            "fire_combat_round".parse::<CommandKind>(),
            Ok(CommandKind::FireCombatRound)
        );
        assert_eq!(CommandKind::UndoPhase.as_ref(), "undo_phase");
    }
}

//! Command execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! checks who may act and when, runs the command's transition phases on a
//! scratch copy, and commits the copy only when every phase succeeds.

mod errors;
mod transition;
pub(crate) mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use turns::TurnSummary;

use crate::action::{Arrival, Command, PhaseChange, Purchased};
use crate::combat::{CombatReport, RetreatReport};
use crate::env::GameEnv;
use crate::state::{Faction, GameState, UnitId};

/// Command-specific result of an accepted command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandOutcome {
    Purchased(Purchased),
    Moved(Arrival),
    Loaded,
    Combat(CombatReport),
    Retreated(RetreatReport),
    Mobilized(Vec<UnitId>),
    PhaseChanged(PhaseChange),
    TurnEnded(TurnSummary),
    Undone,
}

/// Game engine that validates and applies commands.
///
/// All state mutations flow through the three-phase pipeline:
/// pre_validate → apply → post_validate
///
/// A rejected command leaves the state exactly as it was.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes `command` on behalf of `faction`.
    ///
    /// Only the faction whose turn it is may act, and only with commands
    /// legal in the current phase. The accepted command bumps the nonce.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        faction: Faction,
        command: &Command,
    ) -> Result<CommandOutcome, ExecuteError> {
        let kind = command.kind();
        let result = self.validate_issuer(faction, command).and_then(|()| {
            let mut scratch = self.state.clone();
            let outcome = transition::execute_transition(command, &mut scratch, &env)?;
            Ok((scratch, outcome))
        });

        match result {
            Ok((mut scratch, outcome)) => {
                scratch.turn.nonce += 1;
                *self.state = scratch;
                tracing::debug!(
                    faction = %faction,
                    command = %kind,
                    nonce = self.state.turn.nonce,
                    "command applied"
                );
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    faction = %faction,
                    command = %kind,
                    nonce = self.state.turn.nonce,
                    %error,
                    "command rejected"
                );
                Err(error)
            }
        }
    }

    /// Checks the issuing faction and the phase table.
    fn validate_issuer(&self, faction: Faction, command: &Command) -> Result<(), ExecuteError> {
        let nonce = self.state.turn.nonce;
        let current = self.state.current_faction();
        if current != Some(faction) {
            return Err(ExecuteError::faction_not_current(faction, current, nonce));
        }

        let phase = self.state.phase();
        let kind = command.kind();
        if !kind.allowed_in(phase) {
            return Err(ExecuteError::command_not_allowed(kind, phase, faction, nonce));
        }
        Ok(())
    }
}

//! Turn lifecycle commands.

use super::error::PhaseError;
use super::transition::CommandTransition;
use crate::engine::{TurnSummary, turns};
use crate::env::GameEnv;
use crate::state::{GameState, Phase};

/// Advances to the next phase. Ending the mobilize phase ends the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndPhase;

/// Where `EndPhase` left the game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseChange {
    Entered(Phase),
    TurnEnded(TurnSummary),
}

impl CommandTransition for EndPhase {
    type Error = PhaseError;
    type Output = PhaseChange;

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        if state.phase() == Phase::Mobilize {
            return turns::end_turn(state, env).map(PhaseChange::TurnEnded);
        }
        turns::advance_phase(state).map(PhaseChange::Entered)
    }
}

/// Ends the turn from the mobilize phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurn;

impl CommandTransition for EndTurn {
    type Error = PhaseError;
    type Output = TurnSummary;

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        turns::end_turn(state, env)
    }
}

/// Rolls the current movement phase back to its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UndoPhase;

impl CommandTransition for UndoPhase {
    type Error = PhaseError;
    type Output = ();

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.phase_checkpoint.is_none() {
            return Err(PhaseError::NoCheckpoint);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Self::Output, Self::Error> {
        turns::undo_phase(state)
    }
}

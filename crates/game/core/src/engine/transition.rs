//! Command dispatch and execution logic.

use crate::action::{Command, CommandTransition, EndPhase, EndTurn, UndoPhase};
use crate::env::GameEnv;
use crate::state::GameState;

use super::CommandOutcome;
use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<T::Output, TransitionPhaseError<T::Error>>
where
    T: CommandTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

/// Routes a command to its transition and wraps the output.
pub(super) fn execute_transition(
    command: &Command,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<CommandOutcome, ExecuteError> {
    match command {
        Command::PurchaseUnit(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Purchased)
            .map_err(ExecuteError::Purchase),
        Command::MoveUnits(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Moved)
            .map_err(ExecuteError::Move),
        Command::LoadTransport(transition) => drive_transition(transition, state, env)
            .map(|()| CommandOutcome::Loaded)
            .map_err(ExecuteError::Load),
        Command::UnloadTransport(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Moved)
            .map_err(ExecuteError::Unload),
        Command::FireCombatRound(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Combat)
            .map_err(ExecuteError::Fire),
        Command::SelectCasualties(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Combat)
            .map_err(ExecuteError::SelectCasualties),
        Command::Retreat(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Retreated)
            .map_err(ExecuteError::Retreat),
        Command::MobilizeUnits(transition) => drive_transition(transition, state, env)
            .map(CommandOutcome::Mobilized)
            .map_err(ExecuteError::Mobilize),
        Command::EndPhase => drive_transition(&EndPhase, state, env)
            .map(CommandOutcome::PhaseChanged)
            .map_err(ExecuteError::Phase),
        Command::EndTurn => drive_transition(&EndTurn, state, env)
            .map(CommandOutcome::TurnEnded)
            .map_err(ExecuteError::Phase),
        Command::UndoPhase => drive_transition(&UndoPhase, state, env)
            .map(|()| CommandOutcome::Undone)
            .map_err(ExecuteError::Phase),
    }
}

use crate::env::{GameEnv, OracleError};
use crate::state::{Faction, GameState, StateError};

/// Defines how a concrete command mutates the world.
///
/// `pre_validate` checks every legality rule against the untouched state,
/// `apply` mutates, and `post_validate` re-checks the structural invariants.
/// The engine runs all three against a scratch copy, so an error at any stage
/// leaves the caller's state untouched.
pub trait CommandTransition {
    type Error: From<StateError> + From<OracleError>;
    type Output;

    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Output, Self::Error>;

    fn post_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state.verify_invariants(env.units()?)?;
        Ok(())
    }
}

/// Faction whose turn it is. The engine has already checked the issuer.
pub(crate) fn acting_faction(state: &GameState) -> Result<Faction, StateError> {
    state
        .current_faction()
        .ok_or(StateError::NoActiveFaction)
}

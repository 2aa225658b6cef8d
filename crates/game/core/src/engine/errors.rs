//! Error types for the command pipeline.

use crate::action::{CombatError, CommandKind, MoveError, PhaseError, ProductionError};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{Faction, Phase};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

impl<E: GameError> GameError for TransitionPhaseError<E> {
    fn severity(&self) -> ErrorSeverity {
        // Anything failing after apply means the engine broke an invariant.
        match self.phase {
            TransitionPhase::PostValidate => ErrorSeverity::Internal,
            _ => self.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

/// Errors surfaced while executing a command through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("purchase failed: {0}")]
    Purchase(TransitionPhaseError<ProductionError>),

    #[error("move failed: {0}")]
    Move(TransitionPhaseError<MoveError>),

    #[error("loading failed: {0}")]
    Load(TransitionPhaseError<MoveError>),

    #[error("unloading failed: {0}")]
    Unload(TransitionPhaseError<MoveError>),

    #[error("combat round failed: {0}")]
    Fire(TransitionPhaseError<CombatError>),

    #[error("casualty selection failed: {0}")]
    SelectCasualties(TransitionPhaseError<CombatError>),

    #[error("retreat failed: {0}")]
    Retreat(TransitionPhaseError<CombatError>),

    #[error("mobilization failed: {0}")]
    Mobilize(TransitionPhaseError<ProductionError>),

    #[error("phase change failed: {0}")]
    Phase(TransitionPhaseError<PhaseError>),

    #[error("it is {current:?}'s turn, not {faction}'s")]
    FactionNotCurrent {
        faction: Faction,
        current: Option<Faction>,
        context: ErrorContext,
    },

    #[error("{command} is not allowed during the {phase} phase")]
    CommandNotAllowedInPhase {
        command: CommandKind,
        phase: Phase,
        context: ErrorContext,
    },
}

impl ExecuteError {
    pub fn faction_not_current(faction: Faction, current: Option<Faction>, nonce: u64) -> Self {
        Self::FactionNotCurrent {
            faction,
            current,
            context: ErrorContext::new(nonce).with_faction(faction),
        }
    }

    pub fn command_not_allowed(
        command: CommandKind,
        phase: Phase,
        faction: Faction,
        nonce: u64,
    ) -> Self {
        Self::CommandNotAllowedInPhase {
            command,
            phase,
            context: ErrorContext::new(nonce).with_faction(faction),
        }
    }

    /// Pipeline stage that rejected the command, if it got that far.
    pub fn transition_phase(&self) -> Option<TransitionPhase> {
        use ExecuteError::*;
        match self {
            Purchase(error) | Mobilize(error) => Some(error.phase),
            Move(error) | Load(error) | Unload(error) => Some(error.phase),
            Fire(error) | SelectCasualties(error) | Retreat(error) => Some(error.phase),
            Phase(error) => Some(error.phase),
            FactionNotCurrent { .. } | CommandNotAllowedInPhase { .. } => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        use ExecuteError::*;
        match self {
            Purchase(error) | Mobilize(error) => error.severity(),
            Move(error) | Load(error) | Unload(error) => error.severity(),
            Fire(error) | SelectCasualties(error) | Retreat(error) => error.severity(),
            Phase(error) => error.severity(),
            FactionNotCurrent { .. } | CommandNotAllowedInPhase { .. } => {
                ErrorSeverity::RuleViolation
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            ExecuteError::FactionNotCurrent { context, .. }
            | ExecuteError::CommandNotAllowedInPhase { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use ExecuteError::*;
        match self {
            Purchase(error) | Mobilize(error) => error.error_code(),
            Move(error) | Load(error) | Unload(error) => error.error_code(),
            Fire(error) | SelectCasualties(error) | Retreat(error) => error.error_code(),
            Phase(error) => error.error_code(),
            FactionNotCurrent { .. } => "ENGINE_FACTION_NOT_CURRENT",
            CommandNotAllowedInPhase { .. } => "ENGINE_COMMAND_NOT_ALLOWED_IN_PHASE",
        }
    }
}

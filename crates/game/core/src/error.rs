//! Common error infrastructure for conquest-core.
//!
//! Domain-specific errors (`MoveError`, `CombatError`, ...) live next to the
//! commands they validate. They all implement [`GameError`] so callers can
//! classify a rejection without matching on every variant.
//!
//! # Tiers
//!
//! - **Malformed**: the command references ids that do not exist or is missing
//!   required data. This is an integration bug on the caller side.
//! - **RuleViolation**: the command is well formed but illegal right now.
//!   Expected and frequent; the world state is left untouched.
//! - **Internal**: an engine post-condition failed. Never produced by a
//!   correct engine.

use crate::state::{Faction, TerritoryId};

/// Severity level of an error, used for categorization by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Structurally invalid command.
    ///
    /// Examples: unknown territory, unknown unit id, empty unit selection.
    Malformed,

    /// Legal shape, illegal move.
    ///
    /// Examples: territories not adjacent, insufficient IPCs, battle not ready.
    RuleViolation,

    /// Invariant failure detected after applying a command.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::RuleViolation => "rule_violation",
            Self::Internal => "internal",
        }
    }

    /// Rule violations are the only errors a player can fix by choosing a
    /// different command.
    pub const fn is_rule_violation(&self) -> bool {
        matches!(self, Self::RuleViolation)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Contextual information attached to engine-level rejections.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Faction that issued the command.
    pub faction: Option<Faction>,

    /// Territory the command was aimed at, when there is a single one.
    pub territory: Option<TerritoryId>,

    /// Command sequence number at the time of the rejection.
    pub nonce: u64,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            faction: None,
            territory: None,
            nonce,
        }
    }

    #[must_use]
    pub const fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = Some(faction);
        self
    }

    #[must_use]
    pub fn with_territory(mut self, territory: TerritoryId) -> Self {
        self.territory = Some(territory);
        self
    }
}

/// Common trait for all conquest-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - `error_code` returns a stable SCREAMING_SNAKE identifier
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

use super::Faction;

/// Phases of a faction's turn, in order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Phase {
    #[default]
    Purchase,
    CombatMove,
    Combat,
    NonCombatMove,
    Mobilize,
}

impl Phase {
    /// Next phase in the cycle. Mobilize wraps to Purchase.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Purchase => Phase::CombatMove,
            Phase::CombatMove => Phase::Combat,
            Phase::Combat => Phase::NonCombatMove,
            Phase::NonCombatMove => Phase::Mobilize,
            Phase::Mobilize => Phase::Purchase,
        }
    }

    pub const fn is_movement(self) -> bool {
        matches!(self, Phase::CombatMove | Phase::NonCombatMove)
    }
}

/// Session clock: whose turn it is and where in the turn we are.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Turn counter. One faction acts per turn.
    pub turn: u32,

    pub phase: Phase,

    /// Active factions in turn order.
    pub factions: Vec<Faction>,

    /// Incremented by every accepted command; feeds the dice seed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nonce: u64,
}

impl TurnState {
    pub fn new(factions: Vec<Faction>) -> Self {
        Self {
            turn: 0,
            phase: Phase::Purchase,
            factions,
            nonce: 0,
        }
    }

    /// Faction whose turn it is, `None` when no faction is active.
    pub fn current_faction(&self) -> Option<Faction> {
        if self.factions.is_empty() {
            return None;
        }
        let index = self.turn as usize % self.factions.len();
        self.factions.get(index).copied()
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(Faction::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_cycle_back_to_purchase() {
        let mut phase = Phase::Purchase;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(phase);
            phase = phase.next();
        }
        assert_eq!(phase, Phase::Purchase);
        assert_eq!(
            seen,
            vec![
                Phase::Purchase,
                Phase::CombatMove,
                Phase::Combat,
                Phase::NonCombatMove,
                Phase::Mobilize
            ]
        );
    }

    #[test]
    fn current_faction_rotates_with_turns() {
        let mut turn = TurnState::default();
        assert_eq!(turn.current_faction(), Some(Faction::SovietUnion));
        turn.turn = 6;
        assert_eq!(turn.current_faction(), Some(Faction::Germany));
        turn.factions.clear();
        assert_eq!(turn.current_faction(), None);
    }
}

use std::collections::BTreeMap;

use crate::state::Faction;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of faces on the combat die. A unit hits when its roll is at or
    /// below its attack (or defense) value.
    pub dice_sides: u32,

    /// Income is collected on turns where `turn % income_interval` equals
    /// `income_interval - 1`, i.e. once per full rotation of the factions.
    pub income_interval: u32,

    /// Opening IPC balance per faction. Missing factions start at zero.
    pub starting_ipcs: BTreeMap<Faction, u32>,

    /// Base seed mixed into every dice roll.
    pub game_seed: u64,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Transports carry at most two land units, carriers at most two air units.
    pub const MAX_CARGO: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DICE_SIDES: u32 = 6;
    pub const DEFAULT_INCOME_INTERVAL: u32 = 5;

    pub fn new() -> Self {
        Self {
            dice_sides: Self::DEFAULT_DICE_SIDES,
            income_interval: Self::DEFAULT_INCOME_INTERVAL,
            starting_ipcs: BTreeMap::new(),
            game_seed: 0,
        }
    }

    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::new()
        }
    }

    pub fn starting_ipcs_for(&self, faction: Faction) -> u32 {
        self.starting_ipcs.get(&faction).copied().unwrap_or(0)
    }

    /// Returns true when income is collected at the end of `turn`.
    pub fn is_income_turn(&self, turn: u32) -> bool {
        let interval = self.income_interval.max(1);
        turn % interval == interval - 1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_is_collected_on_the_last_turn_of_each_rotation() {
        let config = GameConfig::new();
        let income_turns: Vec<u32> = (0..15).filter(|t| config.is_income_turn(*t)).collect();
        assert_eq!(income_turns, vec![4, 9, 14]);
    }

    #[test]
    fn missing_starting_balance_defaults_to_zero() {
        let mut config = GameConfig::new();
        config.starting_ipcs.insert(Faction::Germany, 40);
        assert_eq!(config.starting_ipcs_for(Faction::Germany), 40);
        assert_eq!(config.starting_ipcs_for(Faction::Japan), 0);
    }
}

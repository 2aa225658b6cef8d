//! Dice rolling and hit checks.

use crate::env::{ConfigOracle, GameEnv, OracleError, RngOracle, compute_seed};
use crate::state::{Faction, GameState};

/// A unit hits when its roll is at or below its combat value. A value of
/// zero never hits.
#[inline]
pub fn check_hit(roll: u32, value: u32) -> bool {
    value > 0 && roll <= value
}

/// Dice for a single command. Each die gets its own seed derived from the
/// game seed, the command nonce, the rolling faction and the die index.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    sides: u32,
    game_seed: u64,
    nonce: u64,
    faction: u32,
    next_die: u32,
}

impl<'a> Dice<'a> {
    pub fn new(
        state: &GameState,
        env: &GameEnv<'a>,
        faction: Faction,
    ) -> Result<Self, OracleError> {
        Ok(Self {
            rng: env.rng()?,
            sides: env.config()?.dice_sides(),
            game_seed: state.game_seed,
            nonce: state.turn.nonce,
            faction: faction.turn_position(),
            next_die: 0,
        })
    }

    pub fn roll(&mut self) -> u32 {
        let seed = compute_seed(self.game_seed, self.nonce, self.faction, self.next_die);
        self.next_die = self.next_die.wrapping_add(1);
        self.rng.roll_die(seed, self.sides)
    }

    /// Rolls one die per combat value. Returns the rolls and the hit count.
    pub fn volley(&mut self, values: &[u32]) -> (Vec<u32>, u32) {
        let rolls: Vec<u32> = values.iter().map(|_| self.roll()).collect();
        let hits = rolls
            .iter()
            .zip(values)
            .filter(|(roll, value)| check_hit(**roll, **value))
            .count() as u32;
        (rolls, hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_value_never_hits() {
        assert!(!check_hit(1, 0));
        assert!(check_hit(1, 1));
        assert!(check_hit(3, 3));
        assert!(!check_hit(4, 3));
    }
}

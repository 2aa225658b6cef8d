//! Configuration oracle exposing game tunables to the engine.

use crate::state::Faction;

pub trait ConfigOracle: Send + Sync {
    fn dice_sides(&self) -> u32;

    /// Turns between income collections.
    fn income_interval(&self) -> u32;

    fn starting_ipcs(&self, faction: Faction) -> u32;

    fn game_seed(&self) -> u64;

    /// True when income is collected at the end of `turn`.
    fn is_income_turn(&self, turn: u32) -> bool {
        let interval = self.income_interval().max(1);
        turn % interval == interval - 1
    }
}

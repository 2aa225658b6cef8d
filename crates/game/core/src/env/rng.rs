//! Swappable dice source.
//!
//! Every implementation must be a pure function of its seed so that replaying
//! the same command log reproduces the same battles. Tests plug in scripted
//! implementations that ignore the seed entirely.

pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Rolls a die with `sides` faces (1..=sides).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }
}

/// PCG-XSH-RR generator: one LCG step followed by a xorshift and a random
/// rotation of the high bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rotation = (state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derives the seed for one die.
///
/// * `game_seed` - fixed per game
/// * `nonce` - accepted-command counter
/// * `faction` - turn position of the rolling faction
/// * `die` - index of the die within the command
pub fn compute_seed(game_seed: u64, nonce: u64, faction: u32, die: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (faction as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (die as u64).wrapping_mul(0x85ebca6b);

    // murmur3 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_stay_within_die_faces() {
        let rng = PcgRng;
        for die in 0..500 {
            let roll = rng.roll_die(compute_seed(7, 3, 1, die), 6);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn seeds_differ_per_die_and_nonce() {
        assert_ne!(compute_seed(0, 1, 0, 0), compute_seed(0, 1, 0, 1));
        assert_ne!(compute_seed(0, 1, 0, 0), compute_seed(0, 2, 0, 0));
        assert_eq!(compute_seed(9, 4, 2, 1), compute_seed(9, 4, 2, 1));
    }
}

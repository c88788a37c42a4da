//! Random Replacement Policy.
//!
//! Picks the victim way with a xorshift64 sequence. The seed is fixed, so two runs of
//! the same program evict the same lines.

use super::ReplacementPolicy;

const SEED: u64 = 0x75bc_d15b;

/// Pseudo-random victim selection.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    associativity: usize,
    xorshift: u64,
}

impl RandomPolicy {
    /// Creates the policy; the row count does not matter for random selection.
    pub const fn new(_sets: usize, ways: usize) -> Self {
        Self {
            associativity: if ways == 0 { 1 } else { ways },
            xorshift: SEED,
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.xorshift;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.xorshift = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn select_way_to_evict(&mut self, _row: usize) -> usize {
        (self.next() % self.associativity as u64) as usize
    }

    fn update_stats(&mut self, _way: usize, _row: usize, _is_valid: bool) {}
}

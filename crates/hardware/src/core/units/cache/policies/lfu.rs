//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Keeps an access counter per (row, way). A fill or hit increments the counter and
//! an invalidation clears it. The victim is the first way with a zero counter (an
//! empty slot), otherwise the way with the smallest count; ties go to the lowest way.

use super::ReplacementPolicy;

/// LFU Policy state.
#[derive(Clone, Debug)]
pub struct LfuPolicy {
    counts: Vec<Vec<u32>>,
}

impl LfuPolicy {
    /// Creates a new LFU policy instance with every counter at zero.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            counts: vec![vec![0; ways]; sets],
        }
    }
}

impl ReplacementPolicy for LfuPolicy {
    fn select_way_to_evict(&mut self, row: usize) -> usize {
        let counts = &self.counts[row];
        if let Some(empty) = counts.iter().position(|&c| c == 0) {
            return empty;
        }
        counts
            .iter()
            .enumerate()
            .min_by_key(|&(_, &c)| c)
            .map_or(0, |(way, _)| way)
    }

    fn update_stats(&mut self, way: usize, row: usize, is_valid: bool) {
        let count = &mut self.counts[row][way];
        if is_valid {
            *count = count.saturating_add(1);
        } else {
            *count = 0;
        }
    }
}

//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the way that has not been accessed for the longest time.
//! It keeps an ordered list of ways per row: index 0 is the least recently used,
//! the last index the most recently used.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update_stats()`: O(W) where W is the number of ways (associativity)
//!   - `select_way_to_evict()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit in the associativity
//! - **Worst Case:** Cyclic scans one way larger than the row (every access misses)

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    /// Per-row recency order, least recent first.
    order: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// Initially way 0 is the least recently used in every row.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            order: (0..sets).map(|_| (0..ways).collect()).collect(),
        }
    }
}

impl ReplacementPolicy for LruPolicy {
    fn select_way_to_evict(&mut self, row: usize) -> usize {
        self.order[row].first().copied().unwrap_or(0)
    }

    /// Moves `way` to the most-recent end, or to the least-recent end when it was
    /// invalidated so it is reused first.
    fn update_stats(&mut self, way: usize, row: usize, is_valid: bool) {
        let list = &mut self.order[row];
        if let Some(pos) = list.iter().position(|&w| w == way) {
            let _ = list.remove(pos);
        }
        if is_valid {
            list.push(way);
        } else {
            list.insert(0, way);
        }
    }
}

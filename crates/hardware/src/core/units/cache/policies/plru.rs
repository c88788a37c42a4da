//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates the Least Recently Used algorithm with a binary tree of bits,
//! one per internal node (N-1 bits for N ways). Each bit points toward the subtree
//! that should be evicted next. An access flips the bits on its path to point away
//! from the accessed way; an invalidation points them toward it.
//!
//! Associativity that is not a power of two is handled by padding the tree; padded
//! leaves are never selected.
//!
//! # Performance
//!
//! - **Time Complexity:** O(log W) for both operations
//! - **Space Complexity:** O(S × W) bits where S is sets, W is ways
//! - **Worst Case:** Pathological cases can cause premature eviction of useful lines

use super::ReplacementPolicy;

/// PLRU Policy state.
#[derive(Clone, Debug)]
pub struct PlruPolicy {
    /// Tree bits per row, heap-ordered (node `n` has children `2n+1` and `2n+2`).
    /// `true` means "the victim is in the right subtree".
    trees: Vec<Vec<bool>>,
    ways: usize,
    leaves: usize,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    pub fn new(sets: usize, ways: usize) -> Self {
        let leaves = ways.max(1).next_power_of_two();
        Self {
            trees: vec![vec![false; leaves - 1]; sets],
            ways,
            leaves,
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    fn select_way_to_evict(&mut self, row: usize) -> usize {
        let tree = &self.trees[row];
        let (mut node, mut lo, mut span) = (0, 0, self.leaves);
        while span > 1 {
            span /= 2;
            let go_right = tree[node] && lo + span < self.ways;
            if go_right {
                lo += span;
                node = 2 * node + 2;
            } else {
                node = 2 * node + 1;
            }
        }
        lo
    }

    fn update_stats(&mut self, way: usize, row: usize, is_valid: bool) {
        let tree = &mut self.trees[row];
        let (mut node, mut lo, mut span) = (0, 0, self.leaves);
        while span > 1 {
            span /= 2;
            let in_right = way >= lo + span;
            // Valid: point away from the accessed way. Invalid: point toward it.
            tree[node] = if is_valid { !in_right } else { in_right };
            if in_right {
                lo += span;
                node = 2 * node + 2;
            } else {
                node = 2 * node + 1;
            }
        }
    }
}

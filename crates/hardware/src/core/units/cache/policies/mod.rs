//! Cache Replacement Policies.
//!
//! Implements the algorithms that select a victim way in a set-associative cache.
//! Every policy works purely on per-row usage bookkeeping and never sees cache contents.
//!
//! # Policies
//!
//! - `Random`: Uniform pseudo-random selection.
//! - `Lru`: Least Recently Used.
//! - `Lfu`: Least Frequently Used.
//! - `Plru`: Pseudo-LRU (Tree-based).

/// Least Frequently Used replacement policy.
pub mod lfu;

/// Least Recently Used replacement policy.
pub mod lru;

/// Pseudo-LRU (tree-based) replacement policy.
pub mod plru;

/// Random replacement policy.
pub mod random;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use plru::PlruPolicy;
pub use random::RandomPolicy;

use crate::config::ReplacementPolicy as PolicyKind;

/// Trait for cache replacement policies.
///
/// Defines the interface for recording usage and selecting victim ways.
pub trait ReplacementPolicy: std::fmt::Debug {
    /// Picks the way at `row` to evict on a miss.
    fn select_way_to_evict(&mut self, row: usize) -> usize;

    /// Records an access to `(way, row)`.
    ///
    /// `is_valid` is `true` after a hit or fill and `false` when the line was just
    /// invalidated (evicted).
    fn update_stats(&mut self, way: usize, row: usize, is_valid: bool);
}

/// Builds the policy selected in the configuration.
pub fn build(kind: PolicyKind, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Random => Box::new(RandomPolicy::new(sets, ways)),
        PolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyKind::Lfu => Box::new(LfuPolicy::new(sets, ways)),
        PolicyKind::Plru => Box::new(PlruPolicy::new(sets, ways)),
    }
}

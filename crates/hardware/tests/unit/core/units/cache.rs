//! Cache Unit Tests.
//!
//! Exercises the set-associative cache over an instrumented backing memory: hit/miss
//! accounting for several geometries, the three write policies, eviction write-back,
//! flushing, side-effect free internal reads and the uncached window.

use std::cell::RefCell;
use std::rc::Rc;

use mipsim_core::common::{AccessOptions, SimError};
use mipsim_core::config::{CacheConfig, MemoryConfig, ReplacementPolicy, WritePolicy};
use mipsim_core::core::units::cache::Cache;
use mipsim_core::soc::{LocationStatus, MemoryAccess};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::mocks::memory::{self, MockMemory};

const REG: AccessOptions = AccessOptions::REGULAR;

fn config(sets: usize, block: usize, ways: usize, policy: WritePolicy) -> CacheConfig {
    CacheConfig {
        enabled: true,
        set_count: sets,
        block_size: block,
        associativity: ways,
        replacement: ReplacementPolicy::Lru,
        write_policy: policy,
    }
}

/// A cache over a shared 4 KiB mock memory at address 0.
fn cache_over(cfg: &CacheConfig) -> (Cache, Rc<RefCell<MockMemory>>) {
    let backing = memory::shared(0x1000, 0);
    let cache = Cache::new(Box::new(Rc::clone(&backing)), cfg, &MemoryConfig::default()).unwrap();
    (cache, backing)
}

fn backing_word(backing: &Rc<RefCell<MockMemory>>, addr: u64) -> u32 {
    backing.borrow_mut().read_u32(addr, AccessOptions::INTERNAL).unwrap()
}

fn set_backing_word(backing: &Rc<RefCell<MockMemory>>, addr: u64, val: u32) {
    backing.borrow_mut().write_u32(addr, val, AccessOptions::INTERNAL).unwrap();
}

// ══════════════════════════════════════════════════════════
// 1. Geometry scenarios
// ══════════════════════════════════════════════════════════

/// Reads four words twice over, then writes one word twice, checking memory after
/// each write.
fn run_scenario(cache: &mut Cache, backing: &Rc<RefCell<MockMemory>>) {
    let data = [(0x200, 0x24), (0x204, 0x66), (0x21c, 0x12), (0x300, 0x32)];
    for &(addr, val) in &data {
        set_backing_word(backing, addr, val);
    }
    for _ in 0..2 {
        for &(addr, val) in &data {
            assert_eq!(cache.read_u32(addr, REG).unwrap(), val, "read {addr:#x}");
        }
    }
    for val in [0x24, 0x23] {
        cache.write_u32(0x700, val, REG).unwrap();
        assert_eq!(backing_word(backing, 0x700), val, "write-through reaches memory");
        assert_eq!(cache.read_u32(0x700, AccessOptions::INTERNAL).unwrap(), val);
    }
}

#[rstest]
#[case::direct_mapped(8, 1, 1, 3, 7)]
#[case::one_wide_row(1, 8, 1, 5, 5)]
#[case::square(4, 4, 1, 4, 6)]
fn write_through_allocate_hit_miss_counts(
    #[case] sets: usize,
    #[case] block: usize,
    #[case] ways: usize,
    #[case] hits: u64,
    #[case] misses: u64,
) {
    let (mut cache, backing) = cache_over(&config(sets, block, ways, WritePolicy::WriteThroughAlloc));
    run_scenario(&mut cache, &backing);
    assert_eq!(cache.hit_count(), hits, "hits");
    assert_eq!(cache.miss_count(), misses, "misses");
    assert_eq!(cache.write_count(), 2, "one backing write per store");
    assert_eq!(cache.read_count(), misses * block as u64, "one block fill per miss");
}

#[test]
fn two_ways_keep_conflicting_blocks() {
    let (mut cache, backing) = cache_over(&config(8, 1, 2, WritePolicy::WriteThroughAlloc));
    run_scenario(&mut cache, &backing);
    // 0x200 and 0x300 share a row but fit in two ways.
    assert_eq!(cache.miss_count(), 5);
    assert_eq!(cache.hit_count(), 5);
}

#[test]
fn hit_rate_and_speedup_before_any_access() {
    let (cache, _backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    assert!(cache.hit_rate().abs() < f64::EPSILON);
    assert!((cache.speed_improvement() - 100.0).abs() < f64::EPSILON);
}

#[test]
fn hit_rate_is_a_percentage() {
    let (mut cache, backing) = cache_over(&config(1, 8, 1, WritePolicy::WriteThroughAlloc));
    run_scenario(&mut cache, &backing);
    assert!((cache.hit_rate() - 50.0).abs() < 1e-9);
}

#[test]
fn repeated_hits_beat_uncached_memory() {
    let (mut cache, _backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    for _ in 0..10 {
        let _ = cache.read_u32(0x40, REG).unwrap();
    }
    assert_eq!((cache.hit_count(), cache.miss_count()), (9, 1));
    // 10 lookups plus one fill against ten uncached reads.
    let expected = 100.0 * 100.0 / 20.0;
    assert!((cache.speed_improvement() - expected).abs() < 1e-9);
}

// ══════════════════════════════════════════════════════════
// 2. Write policies
// ══════════════════════════════════════════════════════════

#[test]
fn write_back_keeps_data_in_the_line_until_flush() {
    let (mut cache, backing) = cache_over(&config(4, 2, 1, WritePolicy::WriteBack));
    cache.write_u32(0x100, 5, REG).unwrap();

    assert_eq!(backing_word(&backing, 0x100), 0, "memory untouched before flush");
    assert_eq!(cache.read_u32(0x100, REG).unwrap(), 5);
    assert_eq!(
        cache.location_status(0x100),
        LocationStatus::CACHED | LocationStatus::DIRTY
    );
    assert_eq!(cache.write_count(), 0);

    cache.flush().unwrap();
    assert_eq!(backing_word(&backing, 0x100), 5);
    assert_eq!(cache.write_count(), 2, "the whole block is written back");
    assert_eq!(cache.location_status(0x100), LocationStatus::CACHED);

    let loc = cache.compute_location(0x100);
    let line = cache.line(0, loc.row).unwrap();
    assert!(line.valid, "flush keeps lines valid");
    assert!(!line.dirty);

    let hits = cache.hit_count();
    let _ = cache.read_u32(0x100, REG).unwrap();
    assert_eq!(cache.hit_count(), hits + 1, "still cached after flush");
}

#[test]
fn sync_is_a_flush() {
    let (mut cache, backing) = cache_over(&config(2, 1, 1, WritePolicy::WriteBack));
    cache.write_u32(0x40, 0xabcd, REG).unwrap();
    cache.sync().unwrap();
    assert_eq!(backing_word(&backing, 0x40), 0xabcd);
}

#[test]
fn eviction_writes_back_dirty_line() {
    let (mut cache, backing) = cache_over(&config(1, 1, 1, WritePolicy::WriteBack));
    cache.write_u32(0x100, 0x77, REG).unwrap();
    assert_eq!(backing_word(&backing, 0x100), 0);

    let _ = cache.read_u32(0x200, REG).unwrap();
    assert_eq!(backing_word(&backing, 0x100), 0x77, "victim written back on eviction");
    assert_eq!(cache.write_count(), 1);
    assert_eq!(cache.location_status(0x100), LocationStatus::NONE);
}

#[test]
fn clean_eviction_writes_nothing() {
    let (mut cache, backing) = cache_over(&config(1, 1, 1, WritePolicy::WriteBack));
    let _ = cache.read_u32(0x100, REG).unwrap();
    let _ = cache.read_u32(0x200, REG).unwrap();
    assert_eq!(cache.write_count(), 0);
    assert_eq!(backing.borrow().log().borrow().writes, 0);
}

#[test]
fn write_through_no_alloc_miss_goes_straight_to_memory() {
    let (mut cache, backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteThroughNoAlloc));
    cache.write_u32(0x10, 9, REG).unwrap();

    let c = cache.counters();
    assert_eq!(c.miss_write, 1);
    assert_eq!(c.mem_reads, 0, "no fill on a write miss");
    assert_eq!(c.mem_writes, 1);
    assert_eq!(backing_word(&backing, 0x10), 9);
    let loc = cache.compute_location(0x10);
    assert!(!cache.line(0, loc.row).unwrap().valid);
}

#[test]
fn write_through_no_alloc_hit_updates_line_and_memory() {
    let (mut cache, backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteThroughNoAlloc));
    let _ = cache.read_u32(0x10, REG).unwrap();
    cache.write_u32(0x10, 3, REG).unwrap();
    assert_eq!(cache.counters().hit_write, 1);
    assert_eq!(backing_word(&backing, 0x10), 3);
    assert_eq!(cache.read_u32(0x10, REG).unwrap(), 3);
    assert_eq!(cache.location_status(0x10), LocationStatus::CACHED, "never dirty");
}

// ══════════════════════════════════════════════════════════
// 3. Access paths
// ══════════════════════════════════════════════════════════

#[test]
fn internal_read_has_no_side_effects() {
    let (mut cache, backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    set_backing_word(&backing, 0x20, 0x1234);
    cache.write_u32(0x30, 0x99, REG).unwrap();
    let before = cache.counters();

    assert_eq!(cache.read_u32(0x20, AccessOptions::INTERNAL).unwrap(), 0x1234);
    assert_eq!(cache.read_u32(0x30, AccessOptions::INTERNAL).unwrap(), 0x99, "sees dirty data");
    assert_eq!(cache.counters(), before);
    assert_eq!(cache.location_status(0x20), LocationStatus::NONE, "nothing allocated");
}

#[test]
fn access_spanning_two_blocks_is_split() {
    let (mut cache, backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    set_backing_word(&backing, 0x100, 0x1122_3344);
    set_backing_word(&backing, 0x104, 0x5566_7788);
    assert_eq!(cache.read_u32(0x102, REG).unwrap(), 0x3344_5566);
    assert_eq!(cache.miss_count(), 2);

    cache.write_u32(0x106, 0xaabb_ccdd, REG).unwrap();
    assert_eq!(cache.read_u32(0x104, REG).unwrap(), 0x5566_aabb);
    assert_eq!(cache.read_u32(0x108, REG).unwrap(), 0xccdd_0000);
}

#[test]
fn uncached_window_bypasses_lines() {
    let backing = memory::shared(0x100, 0xf000_0000);
    let mut cache = Cache::new(
        Box::new(Rc::clone(&backing)),
        &config(4, 1, 1, WritePolicy::WriteBack),
        &MemoryConfig::default(),
    )
    .unwrap();
    cache.write_u32(0xf000_0010, 0x42, REG).unwrap();
    assert_eq!(cache.read_u32(0xf000_0010, REG).unwrap(), 0x42);

    let c = cache.counters();
    assert_eq!(c.hit_read + c.hit_write + c.miss_read + c.miss_write, 0);
    assert_eq!((c.mem_reads, c.mem_writes), (1, 1));
    assert_eq!(backing.borrow().log().borrow().writes, 1);
}

#[test]
fn last_word_below_the_uncached_window_is_cached() {
    let backing = memory::shared(0x100, 0xefff_ff00);
    let mut cache = Cache::new(
        Box::new(Rc::clone(&backing)),
        &config(4, 1, 1, WritePolicy::WriteBack),
        &MemoryConfig::default(),
    )
    .unwrap();
    cache.write_u32(0xefff_fff8, 1, REG).unwrap();
    cache.write_u32(0xefff_fffc, 2, REG).unwrap();

    for addr in [0xefff_fff8, 0xefff_fffc] {
        assert!(
            cache.location_status(addr).contains(LocationStatus::DIRTY),
            "{addr:#x} stays in its line"
        );
    }
    let c = cache.counters();
    assert_eq!((c.miss_write, c.mem_writes), (2, 0));
    assert_eq!(backing.borrow().log().borrow().writes, 0);
}

#[test]
fn disabled_cache_forwards_everything() {
    let backing = memory::shared(0x100, 0);
    let cfg = CacheConfig::default();
    let mut cache = Cache::new(Box::new(Rc::clone(&backing)), &cfg, &MemoryConfig::default())
        .unwrap();
    cache.write_u32(0x10, 1, REG).unwrap();
    let _ = cache.read_u32(0x10, REG).unwrap();
    assert_eq!(cache.hit_count() + cache.miss_count(), 0);
    assert!(cache.line(0, 0).is_none());
    assert_eq!(backing_word(&backing, 0x10), 1);
}

#[test]
fn unmapped_backing_propagates() {
    let (mut cache, _backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    assert!(cache.read_u32(0x2000, REG).is_err());
    assert_eq!(cache.location_status(0x2000), LocationStatus::ILLEGAL);
}

#[test]
fn zero_geometry_is_rejected() {
    let backing = memory::shared(0x100, 0);
    let res = Cache::new(
        Box::new(backing),
        &config(0, 1, 1, WritePolicy::WriteBack),
        &MemoryConfig::default(),
    );
    assert!(matches!(res, Err(SimError::InvalidCacheConfig(_))));
}

#[test]
fn reset_invalidates_without_writing_back() {
    let (mut cache, backing) = cache_over(&config(4, 1, 1, WritePolicy::WriteBack));
    cache.write_u32(0x10, 8, REG).unwrap();
    cache.reset();
    assert_eq!(cache.counters(), Default::default());
    assert_eq!(cache.location_status(0x10), LocationStatus::NONE);
    assert_eq!(backing_word(&backing, 0x10), 0, "dirty data dropped");
}

// ══════════════════════════════════════════════════════════
// 4. Address decomposition
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn location_round_trips_to_address(
        addr in 0u64..(1 << 32),
        sets in 1usize..32,
        block in 1usize..16,
        ways in 1usize..4,
    ) {
        let cache = Cache::new(
            Box::new(MockMemory::new(4, 0)),
            &config(sets, block, ways, WritePolicy::WriteBack),
            &MemoryConfig::default(),
        )
        .unwrap();
        let loc = cache.compute_location(addr);
        prop_assert!(loc.row < sets);
        prop_assert!(loc.col < block);
        prop_assert!(loc.byte < 4);
        let rebuilt = cache.calc_base_address(loc.tag, loc.row) + (loc.col * 4 + loc.byte) as u64;
        prop_assert_eq!(rebuilt, addr);
    }
}

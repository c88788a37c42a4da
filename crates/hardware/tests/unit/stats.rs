//! Statistics Collection Tests.

use std::time::Duration;

use mipsim_core::config::{CacheConfig, HazardUnit};
use mipsim_core::stats::SimStats;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::asm;
use crate::common::harness::{self, DATA_BASE, TestContext};

const DATA: i16 = DATA_BASE as i16;

#[test]
fn cpi_is_zero_before_anything_retires() {
    let stats = SimStats::default();
    assert!(stats.cpi().abs() < f64::EPSILON);

    let stats = SimStats { cycles: 12, instructions_retired: 8, ..SimStats::default() };
    assert!((stats.cpi() - 1.5).abs() < f64::EPSILON);
}

#[test]
fn counters_are_copied_from_the_core() {
    let mut ctx = TestContext::pipelined(HazardUnit::StallForward).load_program(&[
        asm::lw(1, DATA, 0),
        asm::addu(2, 1, 1),
        asm::brk(),
    ]);
    let _ = ctx.run_to_stop();

    let stats = SimStats::collect(ctx.core(), Duration::from_millis(3));
    assert_eq!(stats.host_time, Duration::from_millis(3));
    assert_eq!(stats.cycles, ctx.core().cycle_count);
    assert_eq!(stats.instructions_retired, 2);
    assert_eq!(stats.stalls_data, 1);
    assert_eq!(stats.exceptions, 1);
    assert!(stats.cpi() > 1.0);
}

#[test]
fn disabled_caches_report_nothing() {
    let ctx = TestContext::single_cycle();
    let stats = ctx.machine.stats();
    assert_eq!(stats.program_cache, None);
    assert_eq!(stats.data_cache, None);
}

#[test]
fn enabled_cache_is_summarized() {
    let mut config = harness::single_cycle_config(false);
    config.cache_data = CacheConfig {
        enabled: true,
        set_count: 2,
        block_size: 1,
        associativity: 1,
        ..CacheConfig::default()
    };
    let mut ctx = TestContext::new(&config).load_program(&[
        asm::lw(1, DATA, 0),
        asm::lw(2, DATA, 0),
        asm::lw(3, DATA, 0),
        asm::lw(4, DATA + 4, 0),
        asm::brk(),
    ]);
    let _ = ctx.run_to_stop();

    let stats = ctx.machine.stats();
    assert_eq!(stats.program_cache, None);
    let data = stats.data_cache.unwrap();
    assert_eq!((data.hits, data.misses), (2, 2));
    assert_eq!(data.mem_reads, 2);
    assert_eq!(data.mem_writes, 0);
    assert!((data.hit_rate - 50.0).abs() < 1e-9);
}

#[test]
fn reset_clears_cycle_counters() {
    let mut ctx = TestContext::single_cycle().load_program(&[asm::nop(), asm::brk()]);
    let _ = ctx.run_to_stop();
    assert!(ctx.machine.stats().cycles > 0);

    ctx.machine.reset();
    assert_eq!(ctx.machine.stats().cycles, 0);
}

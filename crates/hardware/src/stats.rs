//! Simulation statistics collection and reporting.
//!
//! This module gathers performance metrics from a core after a run. It provides:
//! 1. **Cycles and CPI:** Total cycles, retired instructions and derived ratios.
//! 2. **Stalls and Exceptions:** Hazard stall cycles and dispatched exceptions.
//! 3. **Caches:** Hit/miss counts, backing-memory traffic, the stall estimate and the
//!    speed-improvement estimate for the program and data caches.

use std::time::Duration;

use crate::core::Core;
use crate::core::units::cache::Cache;

/// Snapshot of one cache's counters and derived estimates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CacheStats {
    /// Read and write hits.
    pub hits: u64,
    /// Read and write misses.
    pub misses: u64,
    /// Words read from backing memory.
    pub mem_reads: u64,
    /// Words written to backing memory.
    pub mem_writes: u64,
    /// Estimated cycles spent waiting on memory.
    pub stall_cycles: u64,
    /// Hit rate in percent.
    pub hit_rate: f64,
    /// Uncached time over cached time, in percent.
    pub speed_improvement: f64,
}

impl CacheStats {
    /// Takes a snapshot of `cache`, or `None` when it is disabled.
    pub fn from_cache(cache: &Cache) -> Option<Self> {
        if !cache.config().enabled {
            return None;
        }
        Some(Self {
            hits: cache.hit_count(),
            misses: cache.miss_count(),
            mem_reads: cache.read_count(),
            mem_writes: cache.write_count(),
            stall_cycles: cache.stall_count(),
            hit_rate: cache.hit_rate(),
            speed_improvement: cache.speed_improvement(),
        })
    }
}

/// Simulation statistics structure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimStats {
    /// Host time since the machine was built or reset.
    pub host_time: Duration,
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions that completed writeback.
    pub instructions_retired: u64,
    /// Cycles the hazard unit stalled decode.
    pub stalls_data: u64,
    /// Exceptions dispatched.
    pub exceptions: u64,
    /// Program-side cache, when enabled.
    pub program_cache: Option<CacheStats>,
    /// Data-side cache, when enabled.
    pub data_cache: Option<CacheStats>,
}

impl SimStats {
    /// Collects counters from `core` and its caches.
    pub fn collect(core: &Core, host_time: Duration) -> Self {
        Self {
            host_time,
            cycles: core.cycle_count,
            instructions_retired: core.retired_count,
            stalls_data: core.stall_count,
            exceptions: core.exception_count,
            program_cache: core.program_cache().and_then(CacheStats::from_cache),
            data_cache: core.data_cache().and_then(CacheStats::from_cache),
        }
    }

    /// Cycles per retired instruction; 0 before anything retired.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            return 0.0;
        }
        self.cycles as f64 / self.instructions_retired as f64
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.host_time.as_secs_f64();
        let cyc = self.cycles.max(1);
        let khz = if seconds > 0.0 {
            self.cycles as f64 / seconds / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("MIPS SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {khz:.2} kHz");
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_cpi                  {:.4}", self.cpi());
        println!(
            "stalls.data              {} ({:.2}%)",
            self.stalls_data,
            self.stalls_data as f64 / cyc as f64 * 100.0
        );
        println!("exceptions               {}", self.exceptions);
        println!("----------------------------------------------------------");

        let print_cache = |name: &str, stats: Option<&CacheStats>| match stats {
            Some(c) => {
                println!(
                    "  {name:<8} hits: {:<10} | misses: {:<10} | hit_rate: {:.2}%",
                    c.hits, c.misses, c.hit_rate
                );
                println!(
                    "  {:<8} mem_reads: {:<6} | mem_writes: {:<6} | stalls: {:<8} | speedup: {:.2}%",
                    "", c.mem_reads, c.mem_writes, c.stall_cycles, c.speed_improvement
                );
            }
            None => println!("  {name:<8} disabled"),
        };
        println!("CACHES");
        print_cache("program", self.program_cache.as_ref());
        print_cache("data", self.data_cache.as_ref());
        println!("==========================================================");
    }
}

//! Configuration system for the MIPS simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline core, memory-timing and cache constants.
//! 2. **Structures:** Hierarchical config for the core, memory penalties, and both caches.
//! 3. **Enums:** Hazard-unit mode, replacement policy, and write policy.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`); any omitted
//! field takes its default, and `Config::default()` is used by the CLI when no file is given.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::SimError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden in a
/// JSON configuration document.
mod defaults {
    /// Reset program counter (start of the user program segment).
    pub const START_PC: u64 = crate::common::constants::PC_INIT;

    /// Single-cycle cores model the architectural delay slot unless disabled.
    pub const DELAY_SLOT: bool = true;

    /// Coprocessor 0 is present by default.
    pub const COP0: bool = true;

    /// Backing memory read access time in cycles.
    pub const READ_PENALTY: u64 = 10;

    /// Backing memory write access time in cycles.
    pub const WRITE_PENALTY: u64 = 10;

    /// Per-word access time of a burst continuation in cycles.
    pub const BURST_PENALTY: u64 = 0;

    /// Default number of sets (rows).
    pub const SET_COUNT: usize = 1;

    /// Default block size in 32-bit words.
    pub const BLOCK_SIZE: usize = 1;

    /// Default associativity (1 way = direct-mapped).
    pub const ASSOCIATIVITY: usize = 1;
}

/// Pipeline hazard-unit behavior.
///
/// Only used by the pipelined core; the single-cycle core has no hazards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardUnit {
    /// No hazard detection at all. Dependent instructions observe stale operands.
    #[serde(alias = "None")]
    None,
    /// Stall the decode stage until every source operand is written back.
    #[serde(alias = "Stall")]
    Stall,
    /// Forward results from memory and writeback; stall only where forwarding cannot help.
    #[default]
    #[serde(alias = "StallForward", alias = "forward")]
    StallForward,
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which way to evict when a new block must
/// be installed in a full row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Uniformly random victim selection.
    #[serde(alias = "Random")]
    Random,
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the way that was accessed least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Least Frequently Used replacement policy.
    ///
    /// Evicts the way with the smallest access count, preferring invalid ways.
    #[serde(alias = "Lfu")]
    Lfu,
    /// Pseudo-LRU (tree-based) replacement policy.
    ///
    /// Approximates LRU with one bit per internal tree node.
    #[serde(alias = "Plru")]
    Plru,
}

/// Cache write policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Writes go straight to memory; a write miss does not allocate a line.
    #[serde(alias = "WriteThroughNoAlloc")]
    WriteThroughNoAlloc,
    /// Writes go straight to memory; a write miss allocates a line first.
    #[serde(alias = "WriteThroughAlloc")]
    WriteThroughAlloc,
    /// Writes only mark the line dirty; memory is updated on eviction or flush.
    #[default]
    #[serde(alias = "WriteBack")]
    WriteBack,
}

impl WritePolicy {
    /// Returns `true` for both write-through variants.
    pub const fn is_write_through(self) -> bool {
        !matches!(self, Self::WriteBack)
    }
}

/// Root configuration object.
///
/// # Examples
///
/// ```
/// use mipsim_core::config::{Config, HazardUnit, ReplacementPolicy};
///
/// let json = r#"{
///     "core": { "pipelined": true, "hazard_unit": "stall" },
///     "cache_data": { "enabled": true, "set_count": 8, "replacement": "LFU" }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert!(config.core.pipelined);
/// assert_eq!(config.core.hazard_unit, HazardUnit::Stall);
/// assert_eq!(config.cache_data.replacement, ReplacementPolicy::Lfu);
/// assert!(!config.cache_program.enabled);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Core selection and reset state
    #[serde(default)]
    pub core: CoreConfig,
    /// Backing memory access penalties
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Instruction-side cache
    #[serde(default)]
    pub cache_program: CacheConfig,
    /// Data-side cache
    #[serde(default)]
    pub cache_data: CacheConfig,
}

impl Config {
    /// Parses a JSON document, filling omitted fields with defaults, and validates it.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] on malformed JSON, [`SimError::InvalidCacheConfig`] on
    /// unusable cache geometry.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, otherwise as [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// The first invalid cache configuration found.
    pub fn validate(&self) -> Result<(), SimError> {
        self.cache_program.validate()?;
        self.cache_data.validate()
    }
}

/// Core selection and reset state.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Use the five-stage pipelined core instead of the single-cycle core
    #[serde(default)]
    pub pipelined: bool,

    /// Model the branch delay slot on the single-cycle core (the pipeline always has one)
    #[serde(default = "CoreConfig::default_delay_slot")]
    pub delay_slot: bool,

    /// Hazard handling for the pipelined core
    #[serde(default)]
    pub hazard_unit: HazardUnit,

    /// Attach coprocessor 0 (privileged state)
    #[serde(default = "CoreConfig::default_cop0")]
    pub cop0: bool,

    /// Program counter after reset
    #[serde(default = "CoreConfig::default_pc")]
    pub pc: u64,
}

impl CoreConfig {
    fn default_delay_slot() -> bool {
        defaults::DELAY_SLOT
    }

    fn default_cop0() -> bool {
        defaults::COP0
    }

    fn default_pc() -> u64 {
        defaults::START_PC
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            pipelined: false,
            delay_slot: defaults::DELAY_SLOT,
            hazard_unit: HazardUnit::default(),
            cop0: defaults::COP0,
            pc: defaults::START_PC,
        }
    }
}

/// Backing memory timing, used by cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Cycles for one word read from backing memory
    #[serde(default = "MemoryConfig::default_read_penalty")]
    pub read_penalty: u64,

    /// Cycles for one word written to backing memory
    #[serde(default = "MemoryConfig::default_write_penalty")]
    pub write_penalty: u64,

    /// Cycles for each further word of a burst transfer
    #[serde(default = "MemoryConfig::default_burst_penalty")]
    pub burst_penalty: u64,

    /// Credit burst transfers when filling and writing back blocks
    #[serde(default)]
    pub burst_enabled: bool,
}

impl MemoryConfig {
    fn default_read_penalty() -> u64 {
        defaults::READ_PENALTY
    }

    fn default_write_penalty() -> u64 {
        defaults::WRITE_PENALTY
    }

    fn default_burst_penalty() -> u64 {
        defaults::BURST_PENALTY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            read_penalty: defaults::READ_PENALTY,
            write_penalty: defaults::WRITE_PENALTY,
            burst_penalty: defaults::BURST_PENALTY,
            burst_enabled: false,
        }
    }
}

/// Geometry and policies of one cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Enable this cache; a disabled cache forwards every access
    #[serde(default)]
    pub enabled: bool,

    /// Number of sets (rows)
    #[serde(default = "CacheConfig::default_set_count")]
    pub set_count: usize,

    /// Block size in 32-bit words
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: usize,

    /// Number of ways per set
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: usize,

    /// Victim selection on a miss
    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Write propagation to memory
    #[serde(default)]
    pub write_policy: WritePolicy,
}

impl CacheConfig {
    fn default_set_count() -> usize {
        defaults::SET_COUNT
    }

    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    fn default_associativity() -> usize {
        defaults::ASSOCIATIVITY
    }

    /// Rejects zero geometry on an enabled cache.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidCacheConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.enabled {
            return Ok(());
        }
        for (name, value) in [
            ("set_count", self.set_count),
            ("block_size", self.block_size),
            ("associativity", self.associativity),
        ] {
            if value == 0 {
                return Err(SimError::InvalidCacheConfig(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Disabled, direct-mapped, one word per block, one set.
    fn default() -> Self {
        Self {
            enabled: false,
            set_count: defaults::SET_COUNT,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            replacement: ReplacementPolicy::default(),
            write_policy: WritePolicy::default(),
        }
    }
}

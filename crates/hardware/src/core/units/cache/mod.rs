//! Set-Associative Cache.
//!
//! This module implements a configurable N-way set-associative cache that sits in front of
//! another `MemoryAccess` component. It provides:
//! 1. **Lookup:** Address decomposition into row, column, tag and byte offset.
//! 2. **Replacement:** A pluggable policy (Random, LRU, LFU, PLRU) chosen at construction.
//! 3. **Write Policies:** Write-through with or without allocation, and write-back.
//! 4. **Statistics:** Hit/miss and backing-memory counters with derived stall, hit-rate and
//!    speed-improvement estimates.
//!
//! Addresses in the device window `0xf000_0000..=0xffff_fffe` always bypass the cache.

/// Cache replacement policy implementations (Random, LRU, LFU, PLRU).
pub mod policies;

use tracing::trace;

use self::policies::ReplacementPolicy;
use crate::common::constants::{UNCACHED_LAST, UNCACHED_START, WORD_SIZE};
use crate::common::{AccessOptions, AccessType, Address, MemoryError, SimError};
use crate::config::{CacheConfig, MemoryConfig, WritePolicy};
use crate::soc::traits::{LocationStatus, MemoryAccess, WriteResult};

/// Bytes per cache word.
const WORD_BYTES: usize = WORD_SIZE as usize;

/// Where an address lives in the cache, derived from the address and the geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLocation {
    /// Set index.
    pub row: usize,
    /// Word index within the block.
    pub col: usize,
    /// Tag stored with the line.
    pub tag: u64,
    /// Byte offset within the word.
    pub byte: usize,
}

/// One cache line: validity, dirtiness, tag and the block contents.
///
/// Contents are kept as the big-endian byte image of the block's words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Line holds a block.
    pub valid: bool,
    /// Line was written since it was filled.
    pub dirty: bool,
    /// Tag of the block held.
    pub tag: u64,
    /// Block contents, `block_size * 4` bytes.
    pub data: Vec<u8>,
}

/// Raw access counters. Everything derived is computed from these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Read hits.
    pub hit_read: u64,
    /// Write hits.
    pub hit_write: u64,
    /// Read misses.
    pub miss_read: u64,
    /// Write misses.
    pub miss_write: u64,
    /// Words read from backing memory.
    pub mem_reads: u64,
    /// Words written to backing memory.
    pub mem_writes: u64,
    /// Words of block fills that continued a burst.
    pub burst_reads: u64,
    /// Words of block write-backs that continued a burst.
    pub burst_writes: u64,
}

enum Transfer<'a> {
    Read(&'a mut [u8]),
    Write(&'a [u8]),
}

impl Transfer<'_> {
    const fn kind(&self) -> AccessType {
        match self {
            Self::Read(_) => AccessType::Read,
            Self::Write(_) => AccessType::Write,
        }
    }
}

/// Set-associative cache in front of a backing `MemoryAccess`.
pub struct Cache {
    config: CacheConfig,
    timing: MemoryConfig,
    backing: Box<dyn MemoryAccess>,
    /// Indexed `[way][row]`.
    lines: Vec<Vec<CacheLine>>,
    policy: Box<dyn ReplacementPolicy>,
    counters: CacheCounters,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.config)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Creates a cache over `backing` with the given geometry and memory timing.
    ///
    /// A disabled cache allocates no lines and forwards every access.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidCacheConfig`] if an enabled cache has zero sets, block size or ways.
    pub fn new(
        backing: Box<dyn MemoryAccess>,
        config: &CacheConfig,
        timing: &MemoryConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let lines = if config.enabled {
            let line = CacheLine {
                data: vec![0; config.block_size * WORD_BYTES],
                ..CacheLine::default()
            };
            vec![vec![line; config.set_count]; config.associativity]
        } else {
            Vec::new()
        };
        Ok(Self {
            config: config.clone(),
            timing: *timing,
            backing,
            lines,
            policy: policies::build(config.replacement, config.set_count, config.associativity),
            counters: CacheCounters::default(),
        })
    }

    /// Active configuration.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Raw counters.
    pub const fn counters(&self) -> CacheCounters {
        self.counters
    }

    /// The line at `(way, row)`, if the cache is enabled and the indices are in range.
    pub fn line(&self, way: usize, row: usize) -> Option<&CacheLine> {
        self.lines.get(way)?.get(row)
    }

    /// Decomposes `addr` into row, column, tag and byte offset.
    pub fn compute_location(&self, addr: Address) -> CacheLocation {
        let word_index = addr / WORD_SIZE;
        let byte = (addr % WORD_SIZE) as usize;
        let block = (self.config.block_size as u64).max(1);
        let way_size_words = (self.config.set_count as u64).max(1) * block;
        let index_in_way = word_index % way_size_words;
        CacheLocation {
            row: (index_in_way / block) as usize,
            col: (index_in_way % block) as usize,
            tag: word_index / way_size_words,
            byte,
        }
    }

    /// First byte address of the block with `tag` at `row`.
    pub const fn calc_base_address(&self, tag: u64, row: usize) -> Address {
        (tag * self.config.set_count as u64 + row as u64) * self.config.block_size as u64 * WORD_SIZE
    }

    fn block_bytes(&self) -> usize {
        self.config.block_size * WORD_BYTES
    }

    fn bypasses(&self, addr: Address, len: usize) -> bool {
        let uncached = |a: Address| (UNCACHED_START..=UNCACHED_LAST).contains(&a);
        let last = addr + len.saturating_sub(1) as u64;
        !self.config.enabled || uncached(addr) || uncached(last)
    }

    fn find_way(&self, loc: &CacheLocation) -> Option<usize> {
        self.lines.iter().position(|way| {
            let line = &way[loc.row];
            line.valid && line.tag == loc.tag
        })
    }

    /// Bytes of an access starting at `loc` that spill into following blocks.
    fn overflow(&self, loc: &CacheLocation, len: usize) -> usize {
        (loc.col * WORD_BYTES + loc.byte + len).saturating_sub(self.block_bytes())
    }

    /// Writes `(way, row)` back to memory if it is dirty under write-back, leaving it clean.
    fn write_back(&mut self, way: usize, row: usize) -> Result<(), MemoryError> {
        let line = &self.lines[way][row];
        if !line.dirty || self.config.write_policy != WritePolicy::WriteBack {
            return Ok(());
        }
        let base = self.calc_base_address(line.tag, row);
        trace!(way, row, base = %format_args!("{base:#010x}"), "writing back dirty line");
        let _ = self
            .backing
            .write(base, &line.data, AccessOptions::REGULAR)?;
        let block = self.config.block_size as u64;
        self.counters.mem_writes += block;
        self.counters.burst_writes += block - 1;
        self.lines[way][row].dirty = false;
        Ok(())
    }

    /// Invalidates `(way, row)`, writing it back first if needed.
    fn kick(&mut self, way: usize, row: usize) -> Result<(), MemoryError> {
        self.write_back(way, row)?;
        let line = &mut self.lines[way][row];
        line.valid = false;
        line.dirty = false;
        self.policy.update_stats(way, row, false);
        Ok(())
    }

    /// Looks up, fills and transfers one block-bounded chunk, then continues with the
    /// overflow into the next block. Returns whether a write changed cached data.
    fn access(&mut self, addr: Address, mut transfer: Transfer<'_>) -> Result<bool, MemoryError> {
        let mut addr = addr;
        let mut changed = false;
        loop {
            let len = match &transfer {
                Transfer::Read(buf) => buf.len(),
                Transfer::Write(buf) => buf.len(),
            };
            if len == 0 {
                return Ok(changed);
            }
            let loc = self.compute_location(addr);
            let within = len - self.overflow(&loc, len);
            let kind = transfer.kind();

            let way = match self.find_way(&loc) {
                Some(way) => way,
                None if kind == AccessType::Write
                    && self.config.write_policy == WritePolicy::WriteThroughNoAlloc =>
                {
                    self.counters.miss_write += 1;
                    addr += within as u64;
                    transfer = match transfer {
                        Transfer::Write(buf) => Transfer::Write(&buf[within..]),
                        Transfer::Read(buf) => Transfer::Read(&mut buf[within..]),
                    };
                    continue;
                }
                None => {
                    let victim = self.policy.select_way_to_evict(loc.row);
                    trace!(row = loc.row, victim, tag = loc.tag, "cache miss");
                    self.kick(victim, loc.row)?;
                    victim
                }
            };

            if self.lines[way][loc.row].valid {
                match kind {
                    AccessType::Read => self.counters.hit_read += 1,
                    AccessType::Write => self.counters.hit_write += 1,
                }
            } else {
                match kind {
                    AccessType::Read => self.counters.miss_read += 1,
                    AccessType::Write => self.counters.miss_write += 1,
                }
                let base = self.calc_base_address(loc.tag, loc.row);
                let line = &mut self.lines[way][loc.row];
                self.backing
                    .read(&mut line.data, base, AccessOptions::REGULAR)?;
                line.valid = true;
                line.dirty = false;
                line.tag = loc.tag;
                let block = self.config.block_size as u64;
                self.counters.mem_reads += block;
                self.counters.burst_reads += block - 1;
            }
            self.policy.update_stats(way, loc.row, true);

            let start = loc.col * WORD_BYTES + loc.byte;
            let line = &mut self.lines[way][loc.row];
            transfer = match transfer {
                Transfer::Read(buf) => {
                    let (head, rest) = buf.split_at_mut(within);
                    head.copy_from_slice(&line.data[start..start + within]);
                    Transfer::Read(rest)
                }
                Transfer::Write(buf) => {
                    let (head, rest) = buf.split_at(within);
                    line.dirty = true;
                    let slot = &mut line.data[start..start + within];
                    if slot != head {
                        slot.copy_from_slice(head);
                        changed = true;
                    }
                    Transfer::Write(rest)
                }
            };
            addr += within as u64;
        }
    }

    /// Side-effect free read: cached bytes come from the lines, the rest from memory.
    fn internal_read(&mut self, dest: &mut [u8], addr: Address) -> Result<(), MemoryError> {
        let mut done = 0;
        while done < dest.len() {
            let cur = addr + done as u64;
            let loc = self.compute_location(cur);
            let remaining = dest.len() - done;
            let within = remaining - self.overflow(&loc, remaining);
            let chunk = &mut dest[done..done + within];
            match self.find_way(&loc) {
                Some(way) => {
                    let start = loc.col * WORD_BYTES + loc.byte;
                    chunk.copy_from_slice(&self.lines[way][loc.row].data[start..start + within]);
                }
                None => self.backing.read(chunk, cur, AccessOptions::INTERNAL)?,
            }
            done += within;
        }
        Ok(())
    }

    /// Writes back every dirty line. Lines stay valid and become clean.
    ///
    /// # Errors
    ///
    /// Propagates backing-memory write failures.
    pub fn flush(&mut self) -> Result<(), MemoryError> {
        if !self.config.enabled {
            return Ok(());
        }
        for way in 0..self.config.associativity {
            for row in 0..self.config.set_count {
                if self.lines[way][row].valid {
                    self.write_back(way, row)?;
                }
            }
        }
        Ok(())
    }

    /// Invalidates all lines without writing back and zeroes every counter.
    pub fn reset(&mut self) {
        for line in self.lines.iter_mut().flatten() {
            line.valid = false;
            line.dirty = false;
        }
        self.counters = CacheCounters::default();
    }

    /// Total hits.
    pub const fn hit_count(&self) -> u64 {
        self.counters.hit_read + self.counters.hit_write
    }

    /// Total misses.
    pub const fn miss_count(&self) -> u64 {
        self.counters.miss_read + self.counters.miss_write
    }

    /// Words read from backing memory.
    pub const fn read_count(&self) -> u64 {
        self.counters.mem_reads
    }

    /// Words written to backing memory.
    pub const fn write_count(&self) -> u64 {
        self.counters.mem_writes
    }

    fn burst_credit(&self) -> u64 {
        if !self.timing.burst_enabled {
            return 0;
        }
        let c = &self.counters;
        let t = &self.timing;
        c.burst_reads * t.read_penalty.saturating_sub(t.burst_penalty)
            + c.burst_writes * t.write_penalty.saturating_sub(t.burst_penalty)
    }

    /// Estimated cycles the core spent waiting on this cache.
    pub fn stall_count(&self) -> u64 {
        let c = &self.counters;
        let t = &self.timing;
        let cycles = c.mem_reads * t.read_penalty.saturating_sub(1)
            + c.mem_writes * t.write_penalty.saturating_sub(1)
            + self.miss_count() * self.config.block_size as u64;
        cycles.saturating_sub(self.burst_credit())
    }

    /// Percentage of accesses that hit; 0 before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count() + self.miss_count();
        if total == 0 {
            return 0.0;
        }
        self.hit_count() as f64 / total as f64 * 100.0
    }

    /// Time without the cache relative to time with it, as a percentage; 100 before any
    /// access.
    pub fn speed_improvement(&self) -> f64 {
        let c = &self.counters;
        let t = &self.timing;
        if self.hit_count() + self.miss_count() == 0 {
            return 100.0;
        }
        let mut lookup = c.hit_read + c.miss_read;
        if self.config.write_policy == WritePolicy::WriteBack {
            lookup += c.hit_write + c.miss_write;
        }
        let mem_time = (c.mem_reads * t.read_penalty + c.mem_writes * t.write_penalty)
            .saturating_sub(self.burst_credit());
        let uncached = (c.miss_read + c.hit_read) * t.read_penalty
            + (c.miss_write + c.hit_write) * t.write_penalty;
        let cached = lookup + mem_time;
        if cached == 0 {
            return 100.0;
        }
        uncached as f64 / cached as f64 * 100.0
    }
}

impl MemoryAccess for Cache {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        if self.bypasses(addr, dest.len()) {
            self.counters.mem_reads += 1;
            return self.backing.read(dest, addr, opts);
        }
        if opts.is_internal() {
            return self.internal_read(dest, addr);
        }
        let _ = self.access(addr, Transfer::Read(dest))?;
        Ok(())
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        if self.bypasses(addr, src.len()) {
            self.counters.mem_writes += 1;
            return self.backing.write(addr, src, opts);
        }
        let changed = self.access(addr, Transfer::Write(src))?;
        if self.config.write_policy.is_write_through() {
            self.counters.mem_writes += 1;
            return self.backing.write(addr, src, opts);
        }
        Ok(WriteResult {
            n_bytes: src.len(),
            changed,
        })
    }

    fn sync(&mut self) -> Result<(), MemoryError> {
        self.flush()
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        if self.config.enabled {
            let loc = self.compute_location(addr);
            if let Some(way) = self.find_way(&loc) {
                let dirty = self.lines[way][loc.row].dirty
                    && self.config.write_policy == WritePolicy::WriteBack;
                return if dirty {
                    LocationStatus::CACHED | LocationStatus::DIRTY
                } else {
                    LocationStatus::CACHED
                };
            }
        }
        self.backing.location_status(addr)
    }

    fn as_cache(&self) -> Option<&Cache> {
        Some(self)
    }

    fn as_cache_mut(&mut self) -> Option<&mut Cache> {
        Some(self)
    }
}

//! Physical address router.
//!
//! This module implements the interconnect that routes physical accesses to devices. It provides:
//! 1. **Range registration:** Devices are mapped over inclusive address ranges, kept sorted,
//!    and overlapping registrations are rejected.
//! 2. **Access routing:** Reads and writes are split at range boundaries and forwarded with
//!    device-relative offsets; a last-hit hint keeps sequential traffic cheap.
//! 3. **Introspection:** `location_status` reports unmapped addresses as illegal.

use tracing::debug;

use crate::common::{AccessOptions, Address, MemoryError, SimError};
use crate::soc::traits::{LocationStatus, MemoryAccess, WriteResult};

struct RangeDesc {
    start: Address,
    last: Address,
    name: String,
    device: Box<dyn MemoryAccess>,
}

impl RangeDesc {
    #[inline]
    const fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr <= self.last
    }
}

/// Routes physical addresses to the devices mapped over them.
#[derive(Default)]
pub struct PhysAddrSpace {
    ranges: Vec<RangeDesc>,
    last_hit: usize,
}

impl std::fmt::Debug for PhysAddrSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for r in &self.ranges {
            let _ = list.entry(&format_args!("{}: {:#010x}..={:#010x}", r.name, r.start, r.last));
        }
        list.finish()
    }
}

impl PhysAddrSpace {
    /// Creates an empty address space; every access is unmapped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `device` over `start..=last`. The device sees offsets relative to `start`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidMemoryMap`] when the range is empty or overlaps an existing one.
    pub fn insert_range(
        &mut self,
        name: impl Into<String>,
        start: Address,
        last: Address,
        device: Box<dyn MemoryAccess>,
    ) -> Result<(), SimError> {
        let name = name.into();
        if last < start {
            return Err(SimError::InvalidMemoryMap(format!(
                "{name}: range {start:#x}..={last:#x} is empty"
            )));
        }
        if let Some(other) = self.ranges.iter().find(|r| r.start <= last && start <= r.last) {
            return Err(SimError::InvalidMemoryMap(format!(
                "{name}: range {start:#x}..={last:#x} overlaps {}",
                other.name
            )));
        }
        debug!(%name, start = %format_args!("{start:#x}"), last = %format_args!("{last:#x}"), "mapping range");
        self.ranges.push(RangeDesc {
            start,
            last,
            name,
            device,
        });
        self.ranges.sort_by_key(|r| r.start);
        self.last_hit = 0;
        Ok(())
    }

    /// Removes the range named `name`, returning its device.
    pub fn remove_range(&mut self, name: &str) -> Option<Box<dyn MemoryAccess>> {
        let idx = self.ranges.iter().position(|r| r.name == name)?;
        self.last_hit = 0;
        Some(self.ranges.remove(idx).device)
    }

    /// Name and bounds of the range containing `addr`.
    pub fn find_range(&self, addr: Address) -> Option<(&str, Address, Address)> {
        self.ranges
            .iter()
            .find(|r| r.contains(addr))
            .map(|r| (r.name.as_str(), r.start, r.last))
    }

    fn find_index(&mut self, addr: Address) -> Option<usize> {
        if self
            .ranges
            .get(self.last_hit)
            .is_some_and(|r| r.contains(addr))
        {
            return Some(self.last_hit);
        }
        let idx = self.ranges.iter().position(|r| r.contains(addr))?;
        self.last_hit = idx;
        Some(idx)
    }

    /// Length of the chunk starting at `addr` that stays inside range `idx`.
    fn chunk_len(&self, idx: usize, addr: Address, remaining: usize) -> usize {
        let room = self.ranges[idx].last - addr + 1;
        usize::try_from(room).map_or(remaining, |room| room.min(remaining))
    }
}

impl MemoryAccess for PhysAddrSpace {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        let mut done = 0;
        while done < dest.len() {
            let cur = addr + done as u64;
            let idx = self.find_index(cur).ok_or(MemoryError::Unmapped { addr: cur })?;
            let len = self.chunk_len(idx, cur, dest.len() - done);
            let range = &mut self.ranges[idx];
            range
                .device
                .read(&mut dest[done..done + len], cur - range.start, opts)?;
            done += len;
        }
        Ok(())
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        let mut done = 0;
        let mut changed = false;
        while done < src.len() {
            let cur = addr + done as u64;
            let idx = self.find_index(cur).ok_or(MemoryError::Unmapped { addr: cur })?;
            let len = self.chunk_len(idx, cur, src.len() - done);
            let range = &mut self.ranges[idx];
            let res = range
                .device
                .write(cur - range.start, &src[done..done + len], opts)?;
            changed |= res.changed;
            done += len;
        }
        Ok(WriteResult {
            n_bytes: done,
            changed,
        })
    }

    fn sync(&mut self) -> Result<(), MemoryError> {
        for r in &mut self.ranges {
            r.device.sync()?;
        }
        Ok(())
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        self.ranges
            .iter()
            .find(|r| r.contains(addr))
            .map_or(LocationStatus::ILLEGAL, |r| {
                r.device.location_status(addr - r.start)
            })
    }
}

//! Sparse Block Buffer.
//!
//! Backing storage for simulated RAM. The 32-bit address space is split into fixed-size
//! blocks that are allocated on first write, so an image placed at a high address costs
//! only the blocks it touches. Unwritten locations read as zero.

use std::collections::HashMap;

/// Size of one allocation block in bytes.
pub const BLOCK_SIZE: usize = 256;

/// Sparse, lazily allocated byte buffer keyed by block number.
#[derive(Clone, Debug, Default)]
pub struct SparseBuffer {
    blocks: HashMap<u64, Box<[u8; BLOCK_SIZE]>>,
}

impl SparseBuffer {
    /// Creates an empty buffer; every location reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently allocated.
    pub fn allocated_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&self, offset: u64) -> u8 {
        let (block, idx) = split(offset);
        self.blocks.get(&block).map_or(0, |b| b[idx])
    }

    /// Writes a single byte, allocating its block if needed.
    ///
    /// Returns `true` if the stored value changed.
    #[inline]
    pub fn write_u8(&mut self, offset: u64, val: u8) -> bool {
        let (block, idx) = split(offset);
        if val == 0 && !self.blocks.contains_key(&block) {
            return false;
        }
        let slot = &mut self
            .blocks
            .entry(block)
            .or_insert_with(|| Box::new([0; BLOCK_SIZE]))[idx];
        let changed = *slot != val;
        *slot = val;
        changed
    }

    /// Copies bytes starting at `offset` into `dest`.
    pub fn read_slice(&self, offset: u64, dest: &mut [u8]) {
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.read_u8(offset + i as u64);
        }
    }

    /// Copies `src` to `offset`. Returns `true` if any byte changed.
    pub fn write_slice(&mut self, offset: u64, src: &[u8]) -> bool {
        src.iter()
            .enumerate()
            .fold(false, |changed, (i, &b)| self.write_u8(offset + i as u64, b) | changed)
    }

    /// Drops every allocated block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

#[inline]
const fn split(offset: u64) -> (u64, usize) {
    (offset / BLOCK_SIZE as u64, (offset % BLOCK_SIZE as u64) as usize)
}

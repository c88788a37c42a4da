//! Physical System Memory.
//!
//! This module implements the backing RAM device. It provides:
//! 1. **Buffer:** Sparse block storage (`SparseBuffer`) for RAM contents.
//! 2. **Memory:** A `MemoryAccess` implementation over the buffer covering the whole
//!    32-bit address space, used directly or mapped into the physical address router.

/// Sparse block storage for raw bytes.
pub mod buffer;

use self::buffer::SparseBuffer;
use crate::common::constants::ADDRESS_SPACE_END;
use crate::common::{AccessOptions, Address, MemoryError};
use crate::soc::traits::{LocationStatus, MemoryAccess, WriteResult};

/// Sparse RAM spanning the full 32-bit address space.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    buffer: SparseBuffer,
}

impl Memory {
    /// Creates zero-filled memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes all of memory.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Copies `data` to `addr` without any access accounting.
    ///
    /// # Errors
    ///
    /// [`MemoryError::OutOfRange`] when the image does not fit below 4 GiB.
    pub fn load(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        check_range(addr, data.len())?;
        let _ = self.buffer.write_slice(addr, data);
        Ok(())
    }

    /// Direct access to the underlying storage.
    pub const fn buffer(&self) -> &SparseBuffer {
        &self.buffer
    }
}

fn check_range(addr: Address, len: usize) -> Result<(), MemoryError> {
    match addr.checked_add(len as u64) {
        Some(end) if end <= ADDRESS_SPACE_END => Ok(()),
        _ => Err(MemoryError::OutOfRange { addr, len }),
    }
}

impl MemoryAccess for Memory {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        _opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        check_range(addr, dest.len())?;
        self.buffer.read_slice(addr, dest);
        Ok(())
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        _opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        check_range(addr, src.len())?;
        let changed = self.buffer.write_slice(addr, src);
        Ok(WriteResult {
            n_bytes: src.len(),
            changed,
        })
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        if addr < ADDRESS_SPACE_END {
            LocationStatus::NONE
        } else {
            LocationStatus::ILLEGAL
        }
    }
}

//! Program and Data Memory Helpers.
//!
//! Instruction fetch, cache maintenance and cache introspection on the two memory-access
//! objects owned by the core.

use super::Core;
use crate::common::{AccessOptions, ExceptionCause, MemoryError, SimError};
use crate::core::units::cache::Cache;

impl Core {
    /// Reads an instruction word from program memory.
    ///
    /// Misaligned addresses yield `AddrLoad` and unmapped ones `IBus`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Memory`] for fetches past the end of the address space.
    pub(crate) fn fetch_word(&mut self, addr: u64) -> Result<Result<u32, ExceptionCause>, SimError> {
        if addr % 4 != 0 {
            return Ok(Err(ExceptionCause::AddrLoad));
        }
        match self.mem_program.read_u32(addr, AccessOptions::REGULAR) {
            Ok(word) => Ok(Ok(word)),
            Err(MemoryError::Unmapped { .. }) => Ok(Err(ExceptionCause::IBus)),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes back dirty lines of both memories (the `CACHE` instruction).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Memory`] if a write-back fails.
    pub fn sync_memories(&mut self) -> Result<(), SimError> {
        self.mem_program.sync()?;
        self.mem_data.sync()?;
        Ok(())
    }

    /// Program-side cache, if one is configured.
    pub fn program_cache(&self) -> Option<&Cache> {
        self.mem_program.as_cache()
    }

    /// Data-side cache, if one is configured.
    pub fn data_cache(&self) -> Option<&Cache> {
        self.mem_data.as_cache()
    }
}

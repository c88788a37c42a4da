//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Reset State:** Boot program counter and initial stack pointer.
//! 2. **Memory Constants:** Word size and the extent of the modeled address space.
//! 3. **Exception Constants:** Vector offset and the uncached (device) window.

/// Program counter value after reset.
pub const PC_INIT: u64 = 0x8002_0000;

/// Stack pointer (`$sp`, register 29) value after reset.
pub const SP_INIT: u64 = 0xbfff_ff00;

/// Register index of the stack pointer.
pub const SP_REG: u8 = 29;

/// Register index of the return address register written by linking jumps.
pub const RA_REG: u8 = 31;

/// Size of a machine word in bytes.
pub const WORD_SIZE: u64 = 4;

/// Size of an encoded instruction in bytes.
pub const INSTRUCTION_SIZE: u64 = 4;

/// One past the last valid address of the modeled 32-bit address space.
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

/// Offset of the general exception vector from `EBase`.
pub const EXCEPTION_VECTOR_OFFSET: u64 = 0x180;

/// First address of the region that always bypasses caches.
pub const UNCACHED_START: u64 = 0xf000_0000;

/// Last address of the region that always bypasses caches.
pub const UNCACHED_LAST: u64 = 0xffff_fffe;

/// Interrupt line raised when `Count` reaches `Compare`.
pub const COUNTER_IRQ_LEVEL: u32 = 7;

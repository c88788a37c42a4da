//! Memory-Side Components.
//!
//! This module organizes everything that answers memory accesses from the core:
//! the `MemoryAccess` trait, sparse backing RAM, and the physical address router
//! that maps address ranges to devices.

/// Physical address router.
pub mod interconnect;

/// Sparse backing RAM.
pub mod memory;

/// Memory-access trait definitions.
pub mod traits;

pub use interconnect::PhysAddrSpace;
pub use memory::Memory;
pub use traits::{LocationStatus, MemoryAccess, SharedMemory, WriteResult};

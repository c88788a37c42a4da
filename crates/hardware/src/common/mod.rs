//! Common utilities and types used throughout the MIPS simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Reset addresses, exception vector offsets, and memory map limits.
//! 2. **Memory Access:** Read/write classification and regular/internal access options.
//! 3. **Error Handling:** Architectural exception causes and host-level simulator errors.
//! 4. **Register Management:** The register file holding PC, general-purpose registers, HI and LO.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and exception cause definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use data::{AccessKind, AccessOptions, AccessType};
pub use error::{ExceptionCause, MemoryError, SimError};
pub use reg::{RegisterFile, RegisterId};

/// Simulated (physical) address. The modeled machine has a 32-bit address space.
pub type Address = u64;

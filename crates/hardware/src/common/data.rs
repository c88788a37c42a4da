//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Cache Accounting:** Separating read and write hits/misses.
//! 2. **Side-Effect Control:** Distinguishing architectural accesses from debugger/visualizer peeks.

/// Direction of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data (or instruction) read.
    Read,
    /// Data write.
    Write,
}

/// Who is performing an access.
///
/// Internal accesses come from the host (debugger, loader, visualization) and must not
/// leave architectural side effects: no cache statistics, no read-to-clear device flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessKind {
    /// Access issued by the simulated program.
    #[default]
    Regular,
    /// Side-effect free access issued by the host.
    Internal,
}

/// Options passed with every read or write through the memory-access interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessOptions {
    /// Origin of the access.
    pub kind: AccessKind,
}

impl AccessOptions {
    /// Options for an access issued by the simulated program.
    pub const REGULAR: Self = Self {
        kind: AccessKind::Regular,
    };

    /// Options for a side-effect free host access.
    pub const INTERNAL: Self = Self {
        kind: AccessKind::Internal,
    };

    /// Returns `true` for host (debug) accesses.
    #[inline]
    pub fn is_internal(self) -> bool {
        self.kind == AccessKind::Internal
    }
}

//! Exception causes and simulator error definitions.
//!
//! This module defines the two separate failure channels of the simulator:
//! 1. **Architectural Exceptions:** `ExceptionCause`, carried on pipeline latches and
//!    delivered through exception dispatch. These are part of the modeled machine.
//! 2. **Host Errors:** `SimError` and `MemoryError`, which abort the current `step()` and
//!    propagate to the caller because the simulated program cannot recover from them.

use std::fmt;

use thiserror::Error;

use super::Address;

/// Architectural exception causes.
///
/// The discriminant order is the index into the per-cause policy and handler tables;
/// [`ExceptionCause::code`] yields the value stored in the `Cause` register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExceptionCause {
    /// External or timer interrupt.
    Int,
    /// Address error on load or instruction fetch.
    AddrLoad,
    /// Address error on store.
    AddrStore,
    /// Bus error on instruction fetch.
    IBus,
    /// Bus error on data load or store.
    DBus,
    /// `SYSCALL` instruction.
    Syscall,
    /// `BREAK` instruction.
    Break,
    /// Encoding not supported by the decoder.
    ReservedInstruction,
    /// Signed arithmetic overflow.
    Overflow,
    /// Conditional trap instruction fired.
    Trap,
    /// Fetch from an address with a hardware breakpoint.
    HwBreak,
}

impl ExceptionCause {
    /// Number of distinct causes; size of per-cause tables.
    pub const COUNT: usize = 11;

    /// Every cause, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Int,
        Self::AddrLoad,
        Self::AddrStore,
        Self::IBus,
        Self::DBus,
        Self::Syscall,
        Self::Break,
        Self::ReservedInstruction,
        Self::Overflow,
        Self::Trap,
        Self::HwBreak,
    ];

    /// Position of this cause in per-cause tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exception code as recorded in the `Cause` register (`ExcCode` field).
    pub const fn code(self) -> u32 {
        match self {
            Self::Int => 0,
            Self::AddrLoad => 4,
            Self::AddrStore => 5,
            Self::IBus => 6,
            Self::DBus => 7,
            Self::Syscall => 8,
            Self::Break => 9,
            Self::ReservedInstruction => 10,
            Self::Overflow => 12,
            Self::Trap => 13,
            Self::HwBreak => 16,
        }
    }

    /// Returns `true` for asynchronous causes.
    pub const fn is_interrupt(self) -> bool {
        matches!(self, Self::Int)
    }
}

impl fmt::Display for ExceptionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "Int",
            Self::AddrLoad => "AdEL",
            Self::AddrStore => "AdES",
            Self::IBus => "IBE",
            Self::DBus => "DBE",
            Self::Syscall => "Sys",
            Self::Break => "Bp",
            Self::ReservedInstruction => "RI",
            Self::Overflow => "Ov",
            Self::Trap => "Tr",
            Self::HwBreak => "HwBreak",
        };
        f.write_str(name)
    }
}

/// Failure reported by a memory-access implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// No device answers at this address. Converted to a bus-error exception by the core.
    #[error("no device mapped at {addr:#010x}")]
    Unmapped {
        /// First unmapped address touched by the access.
        addr: Address,
    },
    /// The access runs past the end of the modeled address space.
    #[error("access of {len} bytes at {addr:#x} is outside the address space")]
    OutOfRange {
        /// Start address of the access.
        addr: Address,
        /// Length of the access in bytes.
        len: usize,
    },
}

/// Host-level simulator errors.
///
/// These indicate a decoder/ALU contract violation, a misconfiguration, or a host I/O
/// problem. They abort the in-progress `step()` and are never converted into
/// architectural exceptions.
#[derive(Debug, Error)]
pub enum SimError {
    /// An instruction the decoder does not implement reached exception dispatch.
    #[error("unsupported instruction {inst:#010x} at {addr:#010x}")]
    UnsupportedInstruction {
        /// Raw instruction word.
        inst: u32,
        /// Address the instruction was fetched from.
        addr: Address,
    },

    /// A memory operation carried an access-control kind the memory stage cannot perform.
    #[error("access control {0} is not valid for this operation")]
    UnsupportedAccessControl(&'static str),

    /// Out-of-range memory access that cannot be modeled as a bus error.
    #[error("memory access failed: {0}")]
    Memory(#[from] MemoryError),

    /// A register index outside `0..32` reached the register file.
    #[error("register index {0} is out of range")]
    RegisterIndex(usize),

    /// The privileged register `(rd, sel)` is not implemented.
    #[error("coprocessor 0 register ({rd}, {sel}) is not supported")]
    UnsupportedCop0Register {
        /// Register number field.
        rd: u8,
        /// Select field.
        sel: u8,
    },

    /// The cache geometry is unusable.
    #[error("invalid cache configuration: {0}")]
    InvalidCacheConfig(String),

    /// A device range overlaps an existing one or is empty.
    #[error("invalid memory map: {0}")]
    InvalidMemoryMap(String),

    /// Reading an image or configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

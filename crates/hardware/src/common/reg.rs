//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct holding the complete user-visible
//! register state of the modeled MIPS32 core. It provides:
//! 1. **Storage:** Program counter, 31 stored general-purpose registers, HI and LO.
//! 2. **Invariant Enforcement:** Register `$0` reads as zero and ignores writes.
//! 3. **Reset:** Restores the boot program counter and the initial stack pointer.
//! 4. **Observability:** A register dump for debugging and the CLI.
//!
//! Values are stored in 64-bit slots; the 32-bit core keeps them zero-extended.

use std::fmt;

use super::constants::{PC_INIT, SP_INIT, SP_REG};
use super::error::SimError;

/// Index of a general-purpose register, guaranteed to be in `0..32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterId(u8);

impl RegisterId {
    /// The hardwired zero register.
    pub const ZERO: Self = Self(0);

    /// Builds an index from a 5-bit instruction field; upper bits are ignored.
    #[inline]
    pub const fn from_field(field: u32) -> Self {
        Self((field & 0x1f) as u8)
    }

    /// Returns the raw register number.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` for `$0`.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<usize> for RegisterId {
    type Error = SimError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        if idx < 32 {
            Ok(Self(idx as u8))
        } else {
            Err(SimError::RegisterIndex(idx))
        }
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Register file: `pc`, `gp[1..=31]`, `hi`, `lo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    pc: u64,
    gp: [u64; 31],
    hi: u64,
    lo: u64,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file in its reset state.
    pub fn new() -> Self {
        let mut regs = Self {
            pc: 0,
            gp: [0; 31],
            hi: 0,
            lo: 0,
        };
        regs.reset();
        regs
    }

    /// Restores architectural initial values.
    ///
    /// PC is set to the boot address, `$sp` to the initial stack address, and every
    /// other register to zero.
    pub fn reset(&mut self) {
        self.pc = PC_INIT;
        self.gp = [0; 31];
        self.hi = 0;
        self.lo = 0;
        self.write_gp(RegisterId(SP_REG), SP_INIT);
    }

    /// Reads the program counter.
    #[inline]
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Sets the program counter.
    #[inline]
    pub fn set_pc(&mut self, pc: u64) {
        self.pc = pc;
    }

    /// Advances the program counter by one instruction.
    #[inline]
    pub fn pc_inc(&mut self) {
        self.pc = self.pc.wrapping_add(4) & 0xffff_ffff;
    }

    /// Reads a general-purpose register. `$0` always yields 0.
    #[inline]
    pub fn read_gp(&self, reg: RegisterId) -> u64 {
        match reg.0 {
            0 => 0,
            n => self.gp[usize::from(n) - 1],
        }
    }

    /// Writes a general-purpose register. Writes to `$0` are discarded.
    #[inline]
    pub fn write_gp(&mut self, reg: RegisterId, value: u64) {
        if reg.0 != 0 {
            self.gp[usize::from(reg.0) - 1] = value;
        }
    }

    /// Reads a general-purpose register by raw index.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::RegisterIndex`] when `idx >= 32`.
    pub fn read_gp_index(&self, idx: usize) -> Result<u64, SimError> {
        Ok(self.read_gp(RegisterId::try_from(idx)?))
    }

    /// Writes a general-purpose register by raw index.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::RegisterIndex`] when `idx >= 32`.
    pub fn write_gp_index(&mut self, idx: usize, value: u64) -> Result<(), SimError> {
        self.write_gp(RegisterId::try_from(idx)?, value);
        Ok(())
    }

    /// Reads HI (`hi == true`) or LO.
    #[inline]
    pub const fn read_hi_lo(&self, hi: bool) -> u64 {
        if hi { self.hi } else { self.lo }
    }

    /// Writes HI (`hi == true`) or LO.
    #[inline]
    pub fn write_hi_lo(&mut self, hi: bool, value: u64) {
        if hi {
            self.hi = value;
        } else {
            self.lo = value;
        }
    }

    /// Compares everything except the program counter.
    pub fn same_state_ignoring_pc(&self, other: &Self) -> bool {
        self.gp == other.gp && self.hi == other.hi && self.lo == other.lo
    }

    /// Dumps all registers to stdout, four per line.
    pub fn dump(&self) {
        println!("pc ={:#010x} hi ={:#010x} lo ={:#010x}", self.pc, self.hi, self.lo);
        for row in 0..8 {
            let line: Vec<String> = (0..4)
                .map(|col| {
                    let idx = row * 4 + col;
                    format!(
                        "${:<2}={:#010x}",
                        idx,
                        self.read_gp(RegisterId::from_field(idx))
                    )
                })
                .collect();
            println!("{}", line.join(" "));
        }
    }
}

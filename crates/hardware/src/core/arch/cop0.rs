//! Coprocessor 0 (privileged state).
//!
//! This module implements the subset of MIPS32 coprocessor 0 the simulator models. It provides:
//! 1. **Register Descriptors:** Name, write mask and reset value for each register.
//! 2. **Register Map:** Translation of the `(rd, sel)` pair used by `MFC0`/`MTC0`.
//! 3. **Exception Support:** Cause/EPC/BadVAddr recording, `Status.EXL` and the vector address.
//! 4. **Interrupts:** The eight `Cause.IP` lines and the Count/Compare timer on line 7.

use std::fmt;

use crate::common::constants::{COUNTER_IRQ_LEVEL, EXCEPTION_VECTOR_OFFSET};
use crate::common::{ExceptionCause, SimError};

/// Interrupt enable.
pub const STATUS_IE: u32 = 1 << 0;
/// Exception level.
pub const STATUS_EXL: u32 = 1 << 1;
/// Error level.
pub const STATUS_ERL: u32 = 1 << 2;
/// Interrupt mask field (`IM7..IM0`).
pub const STATUS_INT_MASK: u32 = 0xff00;
/// First interrupt-pending / mask bit.
pub const STATUS_INT0: u32 = 1 << 8;

/// Branch-delay bit of `Cause`.
pub const CAUSE_BD: u32 = 1 << 31;
/// `ExcCode` field of `Cause`, including the two reserved low bits.
pub const CAUSE_EXCCODE_MASK: u32 = 0x7f;

/// A modeled coprocessor 0 register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cop0Register {
    /// Thread pointer for `RDHWR $29`.
    UserLocal,
    /// Address of the most recent address error.
    BadVAddr,
    /// Cycle counter.
    Count,
    /// Timer compare value.
    Compare,
    /// Processor status.
    Status,
    /// Cause of the last exception and pending interrupts.
    Cause,
    /// Restart address.
    EPC,
    /// Exception vector base.
    EBase,
    /// Configuration.
    Config,
}

struct Descriptor {
    name: &'static str,
    write_mask: u32,
    init: u32,
}

const DESCRIPTORS: [Descriptor; Cop0Register::COUNT] = [
    Descriptor { name: "UserLocal", write_mask: 0xffff_ffff, init: 0 },
    Descriptor { name: "BadVAddr", write_mask: 0, init: 0 },
    Descriptor { name: "Count", write_mask: 0xffff_ffff, init: 0 },
    Descriptor { name: "Compare", write_mask: 0xffff_ffff, init: 0 },
    Descriptor { name: "Status", write_mask: STATUS_IE | STATUS_INT_MASK, init: 0 },
    Descriptor { name: "Cause", write_mask: 0, init: 0 },
    Descriptor { name: "EPC", write_mask: 0xffff_ffff, init: 0 },
    Descriptor { name: "EBase", write_mask: 0xffff_fffc, init: 0x8000_0000 },
    Descriptor { name: "Config", write_mask: 0, init: 0 },
];

impl Cop0Register {
    /// Number of modeled registers.
    pub const COUNT: usize = 9;

    /// Every register, in storage order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::UserLocal,
        Self::BadVAddr,
        Self::Count,
        Self::Compare,
        Self::Status,
        Self::Cause,
        Self::EPC,
        Self::EBase,
        Self::Config,
    ];

    /// Translates an `MFC0`/`MTC0` `(rd, sel)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedCop0Register`] for pairs that are not modeled.
    pub const fn from_rd_sel(rd: u8, sel: u8) -> Result<Self, SimError> {
        match (rd, sel) {
            (4, 2) => Ok(Self::UserLocal),
            (8, 0) => Ok(Self::BadVAddr),
            (9, 0) => Ok(Self::Count),
            (11, 0) => Ok(Self::Compare),
            (12, 0) => Ok(Self::Status),
            (13, 0) => Ok(Self::Cause),
            (14, 0) => Ok(Self::EPC),
            (15, 1) => Ok(Self::EBase),
            (16, 0) => Ok(Self::Config),
            _ => Err(SimError::UnsupportedCop0Register { rd, sel }),
        }
    }

    /// Register name.
    pub const fn name(self) -> &'static str {
        DESCRIPTORS[self as usize].name
    }

    /// Bits writable by `MTC0`.
    pub const fn write_mask(self) -> u32 {
        DESCRIPTORS[self as usize].write_mask
    }

    /// Reset value.
    pub const fn init_value(self) -> u32 {
        DESCRIPTORS[self as usize].init
    }
}

impl fmt::Display for Cop0Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coprocessor 0 register state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cop0State {
    regs: [u32; Cop0Register::COUNT],
    last_core_cycles: u64,
}

impl Default for Cop0State {
    fn default() -> Self {
        Self::new()
    }
}

impl Cop0State {
    /// Creates the state with every register at its reset value.
    pub fn new() -> Self {
        let mut state = Self {
            regs: [0; Cop0Register::COUNT],
            last_core_cycles: 0,
        };
        state.reset();
        state
    }

    /// Restores reset values and restarts the Count tracker.
    pub fn reset(&mut self) {
        for reg in Cop0Register::ALL {
            self.regs[reg as usize] = reg.init_value();
        }
        self.last_core_cycles = 0;
    }

    /// Reads a register.
    #[inline]
    pub const fn read(&self, reg: Cop0Register) -> u32 {
        self.regs[reg as usize]
    }

    /// Writes a register through its write mask.
    ///
    /// Writing `Count` or `Compare` acknowledges the timer interrupt.
    pub fn write(&mut self, reg: Cop0Register, value: u32) {
        if matches!(reg, Cop0Register::Count | Cop0Register::Compare) {
            self.set_interrupt_signal(COUNTER_IRQ_LEVEL, false);
        }
        let mask = reg.write_mask();
        let slot = &mut self.regs[reg as usize];
        *slot = (value & mask) | (*slot & !mask);
    }

    /// Reads a register addressed as `(rd, sel)`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedCop0Register`] for pairs that are not modeled.
    pub fn read_rd_sel(&self, rd: u8, sel: u8) -> Result<u32, SimError> {
        Ok(self.read(Cop0Register::from_rd_sel(rd, sel)?))
    }

    /// Writes a register addressed as `(rd, sel)`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedCop0Register`] for pairs that are not modeled.
    pub fn write_rd_sel(&mut self, rd: u8, sel: u8, value: u32) -> Result<(), SimError> {
        self.write(Cop0Register::from_rd_sel(rd, sel)?, value);
        Ok(())
    }

    /// Sets a register bypassing the write mask, for exception entry and the host.
    #[inline]
    pub fn write_internal(&mut self, reg: Cop0Register, value: u32) {
        self.regs[reg as usize] = value;
    }

    /// Records the cause code and the branch-delay bit.
    ///
    /// Interrupts leave `ExcCode` zero.
    pub fn update_exception_cause(&mut self, cause: ExceptionCause, in_delay_slot: bool) {
        let mut val = self.read(Cop0Register::Cause);
        if in_delay_slot {
            val |= CAUSE_BD;
        } else {
            val &= !CAUSE_BD;
        }
        val &= !CAUSE_EXCCODE_MASK;
        if !cause.is_interrupt() {
            val |= cause.code() << 2;
        }
        self.write_internal(Cop0Register::Cause, val);
    }

    /// Drives interrupt line `irq` (0..8). Out-of-range lines are ignored.
    pub fn set_interrupt_signal(&mut self, irq: u32, active: bool) {
        if irq >= 8 {
            return;
        }
        let mask = STATUS_INT0 << irq;
        let val = self.read(Cop0Register::Cause);
        let val = if active { val | mask } else { val & !mask };
        self.write_internal(Cop0Register::Cause, val);
    }

    /// Returns `true` if an unmasked interrupt is pending and interrupts are accepted.
    pub const fn core_interrupt_request(&self) -> bool {
        let status = self.read(Cop0Register::Status);
        let pending = status & self.read(Cop0Register::Cause) & STATUS_INT_MASK;
        pending != 0
            && status & STATUS_IE != 0
            && status & STATUS_EXL == 0
            && status & STATUS_ERL == 0
    }

    /// Sets or clears `Status.EXL`.
    pub fn set_status_exl(&mut self, value: bool) {
        let val = self.read(Cop0Register::Status);
        let val = if value { val | STATUS_EXL } else { val & !STATUS_EXL };
        self.write_internal(Cop0Register::Status, val);
    }

    /// Address of the general exception vector.
    #[inline]
    pub const fn exception_pc_address(&self) -> u64 {
        (self.read(Cop0Register::EBase) as u64).wrapping_add(EXCEPTION_VECTOR_OFFSET) & 0xffff_ffff
    }

    /// Restarts Count tracking from `core_cycles` without advancing Count.
    #[inline]
    pub fn sync_core_cycles(&mut self, core_cycles: u64) {
        self.last_core_cycles = core_cycles;
    }

    /// Advances Count by the cycles elapsed since the last call and raises the timer
    /// interrupt when Count passes Compare.
    pub fn update_count_and_compare_irq(&mut self, core_cycles: u64) {
        let count_orig = self.read(Cop0Register::Count);
        let elapsed = core_cycles.wrapping_sub(self.last_core_cycles) as u32;
        let count = count_orig.wrapping_add(elapsed);
        self.last_core_cycles = core_cycles;
        self.write_internal(Cop0Register::Count, count);

        let compare = self.read(Cop0Register::Compare);
        if (compare.wrapping_sub(count_orig) as i32) > 0 && (compare.wrapping_sub(count) as i32) <= 0 {
            self.set_interrupt_signal(COUNTER_IRQ_LEVEL, true);
        }
    }
}

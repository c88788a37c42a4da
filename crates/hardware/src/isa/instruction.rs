//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for MIPS32 instruction fields, the instruction flag set,
//! and the `Decoded` bundle handed from the decoder to the decode stage.

use std::ops::{BitOr, BitOrAssign};

use crate::common::ExceptionCause;
use crate::core::pipeline::signals::{AccessControl, AluOp, ControlFlow, RegDest, SystemOp};

/// Trait for extracting instruction fields from encoded instructions.
///
/// Provides methods to extract all standard MIPS32 instruction fields
/// from a 32-bit instruction encoding.
pub trait InstructionBits {
    /// Primary opcode (bits 31-26).
    fn opcode(&self) -> u32;

    /// First source register field (bits 25-21).
    fn rs(&self) -> u32;

    /// Second source / immediate destination register field (bits 20-16).
    fn rt(&self) -> u32;

    /// Register-format destination field (bits 15-11).
    fn rd(&self) -> u32;

    /// Shift amount (bits 10-6).
    fn shamt(&self) -> u32;

    /// Function code (bits 5-0).
    fn funct(&self) -> u32;

    /// Raw 16-bit immediate.
    fn imm16(&self) -> u32;

    /// Sign-extended 16-bit immediate.
    fn simm(&self) -> u32;

    /// 26-bit jump target field.
    fn target26(&self) -> u32;

    /// Coprocessor register select (bits 2-0).
    fn sel(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline]
    fn opcode(&self) -> u32 {
        self >> 26
    }

    #[inline]
    fn rs(&self) -> u32 {
        (self >> 21) & 0x1f
    }

    #[inline]
    fn rt(&self) -> u32 {
        (self >> 16) & 0x1f
    }

    #[inline]
    fn rd(&self) -> u32 {
        (self >> 11) & 0x1f
    }

    #[inline]
    fn shamt(&self) -> u32 {
        (self >> 6) & 0x1f
    }

    #[inline]
    fn funct(&self) -> u32 {
        self & 0x3f
    }

    #[inline]
    fn imm16(&self) -> u32 {
        self & 0xffff
    }

    #[inline]
    fn simm(&self) -> u32 {
        i32::from(*self as u16 as i16) as u32
    }

    #[inline]
    fn target26(&self) -> u32 {
        self & 0x03ff_ffff
    }

    #[inline]
    fn sel(&self) -> u32 {
        self & 0x7
    }
}

/// Per-instruction property flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InstructionFlags(u32);

impl InstructionFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// The encoding is implemented.
    pub const SUPPORTED: Self = Self(1 << 0);
    /// A result is written to the register file.
    pub const REG_WRITE: Self = Self(1 << 1);
    /// The memory stage reads data memory.
    pub const MEM_READ: Self = Self(1 << 2);
    /// The memory stage writes data memory.
    pub const MEM_WRITE: Self = Self(1 << 3);
    /// ALU operand `b` is the immediate instead of `rt`.
    pub const ALU_SRC_IMM: Self = Self(1 << 4);
    /// The immediate is zero-extended.
    pub const ZERO_EXT_IMM: Self = Self(1 << 5);
    /// Execution needs the `rs` value.
    pub const ALU_REQ_RS: Self = Self(1 << 6);
    /// Execution or memory needs the `rt` value.
    pub const ALU_REQ_RT: Self = Self(1 << 7);
    /// Writes the return address instead of an ALU result.
    pub const LINK: Self = Self(1 << 8);
    /// The fetch of following instructions must wait until this one completes.
    pub const STOP_IF: Self = Self(1 << 9);
    /// The encoding itself raises an exception (`SYSCALL`, `BREAK`).
    pub const EXCEPTION: Self = Self(1 << 10);

    /// Returns `true` if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for InstructionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InstructionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Decoded instruction bundle.
///
/// Everything the core needs from an instruction word besides the raw register fields,
/// which it extracts itself through [`InstructionBits`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Property flags.
    pub flags: InstructionFlags,
    /// ALU operation.
    pub alu: AluOp,
    /// Memory access kind.
    pub mem_ctl: AccessControl,
    /// Jump or branch kind.
    pub flow: ControlFlow,
    /// Result register selection.
    pub dest: RegDest,
    /// Non-pure operation for the execute stage.
    pub sys: SystemOp,
    /// Exception raised by the encoding itself.
    pub excause: Option<ExceptionCause>,
}

impl Decoded {
    /// Returns `true` if the decoder implements this encoding.
    #[inline]
    pub const fn is_supported(&self) -> bool {
        self.flags.contains(InstructionFlags::SUPPORTED)
    }
}

//! Pipeline control signals and operation types.
//!
//! This module defines the signals that control instruction execution. It provides:
//! 1. **Operation Classification:** ALU operations, including the HI/LO and trap families.
//! 2. **Memory Control:** Access widths, sign extension and the composite access kinds.
//! 3. **Control Flow:** Jump and branch kinds resolved by program-counter handling.
//! 4. **Destination Selection:** Which register field (if any) receives the result.

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// No operation; result is zero.
    #[default]
    Nop,

    /// Shift left logical by `sa`.
    Sll,
    /// Shift right logical by `sa`.
    Srl,
    /// Shift right arithmetic by `sa`.
    Sra,
    /// Rotate right by `sa`.
    Rotr,
    /// Shift left logical by `rs[4:0]`.
    Sllv,
    /// Shift right logical by `rs[4:0]`.
    Srlv,
    /// Shift right arithmetic by `rs[4:0]`.
    Srav,
    /// Rotate right by `rs[4:0]`.
    Rotrv,

    /// Move `rs` if `rt` is zero.
    Movz,
    /// Move `rs` if `rt` is nonzero.
    Movn,

    /// Read HI.
    Mfhi,
    /// Write HI.
    Mthi,
    /// Read LO.
    Mflo,
    /// Write LO.
    Mtlo,
    /// Signed 32x32 multiply into HI/LO.
    Mult,
    /// Unsigned 32x32 multiply into HI/LO.
    Multu,
    /// Signed divide: LO quotient, HI remainder.
    Div,
    /// Unsigned divide: LO quotient, HI remainder.
    Divu,
    /// Signed multiply-add to HI/LO.
    Madd,
    /// Unsigned multiply-add to HI/LO.
    Maddu,
    /// Signed multiply-subtract from HI/LO.
    Msub,
    /// Unsigned multiply-subtract from HI/LO.
    Msubu,
    /// Multiply to GPR (low word).
    Mul,

    /// Add, trapping on signed overflow.
    Add,
    /// Add without overflow check.
    Addu,
    /// Subtract, trapping on signed overflow.
    Sub,
    /// Subtract without overflow check.
    Subu,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// Set on signed less-than.
    Slt,
    /// Set on unsigned less-than.
    Sltu,
    /// Load upper immediate (`b << 16`).
    Lui,

    /// Count leading zeros of `rs`.
    Clz,
    /// Count leading ones of `rs`.
    Clo,
    /// Sign-extend byte of `rt`.
    Seb,
    /// Sign-extend half-word of `rt`.
    Seh,
    /// Swap bytes within half-words of `rt`.
    Wsbh,

    /// Pass operand `b` unchanged (link values).
    PassB,

    /// Trap if equal.
    Teq,
    /// Trap if not equal.
    Tne,
    /// Trap if signed greater or equal.
    Tge,
    /// Trap if unsigned greater or equal.
    Tgeu,
    /// Trap if signed less-than.
    Tlt,
    /// Trap if unsigned less-than.
    Tltu,
}

/// Memory access control kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessControl {
    /// No memory access.
    #[default]
    None,
    /// Signed byte.
    Byte,
    /// Signed half-word.
    Half,
    /// Word.
    Word,
    /// Zero-extended byte.
    ByteUnsigned,
    /// Zero-extended half-word.
    HalfUnsigned,
    /// Unaligned word, most-significant part (`LWL`/`SWL`).
    WordLeft,
    /// Unaligned word, least-significant part (`LWR`/`SWR`).
    WordRight,
    /// Load-linked word (`LL`).
    LoadLinked,
    /// Store-conditional word (`SC`).
    StoreConditional,
    /// Cache maintenance (`CACHE`).
    CacheOp,
}

impl AccessControl {
    /// Name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Byte => "byte",
            Self::Half => "half",
            Self::Word => "word",
            Self::ByteUnsigned => "byte-unsigned",
            Self::HalfUnsigned => "half-unsigned",
            Self::WordLeft => "word-left",
            Self::WordRight => "word-right",
            Self::LoadLinked => "load-linked",
            Self::StoreConditional => "store-conditional",
            Self::CacheOp => "cache-op",
        }
    }

    /// Required alignment in bytes; 1 for the unaligned kinds.
    pub const fn alignment(self) -> u64 {
        match self {
            Self::Half | Self::HalfUnsigned => 2,
            Self::Word | Self::LoadLinked | Self::StoreConditional => 4,
            _ => 1,
        }
    }
}

/// Comparison evaluated by a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCond {
    /// `rs == rt`.
    Equal,
    /// `rs < 0`.
    LessThanZero,
    /// `rs <= 0`.
    LessOrEqualZero,
}

/// Control-flow kind of an instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Sequential.
    #[default]
    None,
    /// `J`/`JAL`: 26-bit target in the 256 MB segment of the delay slot.
    Jump,
    /// `JR`/`JALR`: target taken from `rs`.
    JumpRegister,
    /// Conditional PC-relative branch.
    Branch {
        /// Comparison.
        cond: BranchCond,
        /// Invert the comparison result.
        negate: bool,
        /// Nullify the delay slot when not taken.
        likely: bool,
    },
}

/// Register that receives the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegDest {
    /// No register write.
    #[default]
    None,
    /// The `rt` field (immediate forms and loads).
    Rt,
    /// The `rd` field (register forms).
    Rd,
    /// `$31` (`JAL`, `BAL` and the linking branches).
    Ra,
}

/// Privileged or non-pure operation performed directly by the execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SystemOp {
    /// None; the ALU result is used.
    #[default]
    None,
    /// Move from coprocessor 0.
    Mfc0,
    /// Move to coprocessor 0.
    Mtc0,
    /// Return from exception.
    Eret,
    /// Read hardware register.
    Rdhwr,
}

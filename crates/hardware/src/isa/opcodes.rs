//! MIPS32 Opcodes and Function Codes.
//!
//! Defines the primary opcodes (bits 31-26) and the secondary selector fields used by
//! the decoder.

/// Register-format instructions; operation in `funct`.
pub const OP_SPECIAL: u32 = 0x00;
/// `rt`-selected branches and traps.
pub const OP_REGIMM: u32 = 0x01;
/// Jump.
pub const OP_J: u32 = 0x02;
/// Jump and link.
pub const OP_JAL: u32 = 0x03;
/// Branch on equal.
pub const OP_BEQ: u32 = 0x04;
/// Branch on not equal.
pub const OP_BNE: u32 = 0x05;
/// Branch on less than or equal to zero.
pub const OP_BLEZ: u32 = 0x06;
/// Branch on greater than zero.
pub const OP_BGTZ: u32 = 0x07;
/// Add immediate (trapping).
pub const OP_ADDI: u32 = 0x08;
/// Add immediate unsigned.
pub const OP_ADDIU: u32 = 0x09;
/// Set on less than immediate.
pub const OP_SLTI: u32 = 0x0a;
/// Set on less than immediate unsigned.
pub const OP_SLTIU: u32 = 0x0b;
/// AND immediate.
pub const OP_ANDI: u32 = 0x0c;
/// OR immediate.
pub const OP_ORI: u32 = 0x0d;
/// XOR immediate.
pub const OP_XORI: u32 = 0x0e;
/// Load upper immediate.
pub const OP_LUI: u32 = 0x0f;
/// Coprocessor 0.
pub const OP_COP0: u32 = 0x10;
/// Branch on equal likely.
pub const OP_BEQL: u32 = 0x14;
/// Branch on not equal likely.
pub const OP_BNEL: u32 = 0x15;
/// Branch on less than or equal to zero likely.
pub const OP_BLEZL: u32 = 0x16;
/// Branch on greater than zero likely.
pub const OP_BGTZL: u32 = 0x17;
/// `MUL`, `MADD`, `CLZ` and friends.
pub const OP_SPECIAL2: u32 = 0x1c;
/// `BSHFL` and `RDHWR`.
pub const OP_SPECIAL3: u32 = 0x1f;
/// Load byte.
pub const OP_LB: u32 = 0x20;
/// Load half-word.
pub const OP_LH: u32 = 0x21;
/// Load word left.
pub const OP_LWL: u32 = 0x22;
/// Load word.
pub const OP_LW: u32 = 0x23;
/// Load byte unsigned.
pub const OP_LBU: u32 = 0x24;
/// Load half-word unsigned.
pub const OP_LHU: u32 = 0x25;
/// Load word right.
pub const OP_LWR: u32 = 0x26;
/// Store byte.
pub const OP_SB: u32 = 0x28;
/// Store half-word.
pub const OP_SH: u32 = 0x29;
/// Store word left.
pub const OP_SWL: u32 = 0x2a;
/// Store word.
pub const OP_SW: u32 = 0x2b;
/// Store word right.
pub const OP_SWR: u32 = 0x2e;
/// Cache maintenance.
pub const OP_CACHE: u32 = 0x2f;
/// Load linked.
pub const OP_LL: u32 = 0x30;
/// Store conditional.
pub const OP_SC: u32 = 0x38;

/// `SPECIAL` function codes.
pub mod funct {
    /// Shift left logical (also `NOP`).
    pub const SLL: u32 = 0x00;
    /// Shift right logical; `ROTR` when `rs == 1`.
    pub const SRL: u32 = 0x02;
    /// Shift right arithmetic.
    pub const SRA: u32 = 0x03;
    /// Shift left logical variable.
    pub const SLLV: u32 = 0x04;
    /// Shift right logical variable; `ROTRV` when `sa == 1`.
    pub const SRLV: u32 = 0x06;
    /// Shift right arithmetic variable.
    pub const SRAV: u32 = 0x07;
    /// Jump register.
    pub const JR: u32 = 0x08;
    /// Jump and link register.
    pub const JALR: u32 = 0x09;
    /// Move conditional on zero.
    pub const MOVZ: u32 = 0x0a;
    /// Move conditional on not zero.
    pub const MOVN: u32 = 0x0b;
    /// System call.
    pub const SYSCALL: u32 = 0x0c;
    /// Breakpoint.
    pub const BREAK: u32 = 0x0d;
    /// Memory barrier.
    pub const SYNC: u32 = 0x0f;
    /// Move from HI.
    pub const MFHI: u32 = 0x10;
    /// Move to HI.
    pub const MTHI: u32 = 0x11;
    /// Move from LO.
    pub const MFLO: u32 = 0x12;
    /// Move to LO.
    pub const MTLO: u32 = 0x13;
    /// Multiply.
    pub const MULT: u32 = 0x18;
    /// Multiply unsigned.
    pub const MULTU: u32 = 0x19;
    /// Divide.
    pub const DIV: u32 = 0x1a;
    /// Divide unsigned.
    pub const DIVU: u32 = 0x1b;
    /// Add (trapping).
    pub const ADD: u32 = 0x20;
    /// Add unsigned.
    pub const ADDU: u32 = 0x21;
    /// Subtract (trapping).
    pub const SUB: u32 = 0x22;
    /// Subtract unsigned.
    pub const SUBU: u32 = 0x23;
    /// AND.
    pub const AND: u32 = 0x24;
    /// OR.
    pub const OR: u32 = 0x25;
    /// XOR.
    pub const XOR: u32 = 0x26;
    /// NOR.
    pub const NOR: u32 = 0x27;
    /// Set on less than.
    pub const SLT: u32 = 0x2a;
    /// Set on less than unsigned.
    pub const SLTU: u32 = 0x2b;
    /// Trap if greater or equal.
    pub const TGE: u32 = 0x30;
    /// Trap if greater or equal unsigned.
    pub const TGEU: u32 = 0x31;
    /// Trap if less than.
    pub const TLT: u32 = 0x32;
    /// Trap if less than unsigned.
    pub const TLTU: u32 = 0x33;
    /// Trap if equal.
    pub const TEQ: u32 = 0x34;
    /// Trap if not equal.
    pub const TNE: u32 = 0x36;
}

/// `REGIMM` selectors held in the `rt` field.
pub mod regimm {
    /// Branch on less than zero.
    pub const BLTZ: u32 = 0x00;
    /// Branch on greater or equal to zero.
    pub const BGEZ: u32 = 0x01;
    /// Branch on less than zero likely.
    pub const BLTZL: u32 = 0x02;
    /// Branch on greater or equal to zero likely.
    pub const BGEZL: u32 = 0x03;
    /// Trap if greater or equal immediate.
    pub const TGEI: u32 = 0x08;
    /// Trap if greater or equal immediate unsigned.
    pub const TGEIU: u32 = 0x09;
    /// Trap if less than immediate.
    pub const TLTI: u32 = 0x0a;
    /// Trap if less than immediate unsigned.
    pub const TLTIU: u32 = 0x0b;
    /// Trap if equal immediate.
    pub const TEQI: u32 = 0x0c;
    /// Trap if not equal immediate.
    pub const TNEI: u32 = 0x0e;
    /// Branch on less than zero and link.
    pub const BLTZAL: u32 = 0x10;
    /// Branch on greater or equal to zero and link (`BAL` when `rs == 0`).
    pub const BGEZAL: u32 = 0x11;
}

/// `SPECIAL2` function codes.
pub mod special2 {
    /// Multiply-add.
    pub const MADD: u32 = 0x00;
    /// Multiply-add unsigned.
    pub const MADDU: u32 = 0x01;
    /// Multiply to GPR.
    pub const MUL: u32 = 0x02;
    /// Multiply-subtract.
    pub const MSUB: u32 = 0x04;
    /// Multiply-subtract unsigned.
    pub const MSUBU: u32 = 0x05;
    /// Count leading zeros.
    pub const CLZ: u32 = 0x20;
    /// Count leading ones.
    pub const CLO: u32 = 0x21;
}

/// `SPECIAL3` function codes and `BSHFL` selectors (held in `sa`).
pub mod special3 {
    /// Byte-shuffle group.
    pub const BSHFL: u32 = 0x20;
    /// Read hardware register.
    pub const RDHWR: u32 = 0x3b;
    /// `BSHFL`: swap bytes within half-words.
    pub const WSBH: u32 = 0x02;
    /// `BSHFL`: sign-extend byte.
    pub const SEB: u32 = 0x10;
    /// `BSHFL`: sign-extend half-word.
    pub const SEH: u32 = 0x18;
}

/// `COP0` selectors held in the `rs` field, and `CO`-format functions.
pub mod cop0 {
    /// Move from coprocessor 0.
    pub const MFC0: u32 = 0x00;
    /// Move to coprocessor 0.
    pub const MTC0: u32 = 0x04;
    /// First `rs` value of the `CO` format (bit 25 set).
    pub const CO: u32 = 0x10;
    /// `CO` function: exception return.
    pub const ERET: u32 = 0x18;
}

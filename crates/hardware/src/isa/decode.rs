//! MIPS32 Instruction Decoder.
//!
//! Maps a 32-bit instruction word to its `Decoded` control bundle. Decoding is a pure
//! `match` over the opcode and selector fields; encodings outside the implemented subset
//! decode to a bundle without the `SUPPORTED` flag and are reported by the decode stage as
//! a reserved-instruction exception.

use crate::common::ExceptionCause;
use crate::core::pipeline::signals::{
    AccessControl, AluOp, BranchCond, ControlFlow, RegDest, SystemOp,
};
use crate::isa::instruction::{Decoded, InstructionBits, InstructionFlags as F};
use crate::isa::opcodes::{self, cop0, funct, regimm, special2, special3};

fn base(flags: F, alu: AluOp, dest: RegDest) -> Decoded {
    Decoded {
        flags: F::SUPPORTED | flags,
        alu,
        mem_ctl: AccessControl::None,
        flow: ControlFlow::None,
        dest,
        sys: SystemOp::None,
        excause: None,
    }
}

/// `rd = rs op rt`.
fn r_type(alu: AluOp) -> Decoded {
    base(F::REG_WRITE | F::ALU_REQ_RS | F::ALU_REQ_RT, alu, RegDest::Rd)
}

/// `rd = rt op sa`.
fn shift_imm(alu: AluOp) -> Decoded {
    base(F::REG_WRITE | F::ALU_REQ_RT, alu, RegDest::Rd)
}

/// `rt = rs op imm`.
fn i_type(alu: AluOp, zero_ext: bool) -> Decoded {
    let ext = if zero_ext { F::ZERO_EXT_IMM } else { F::NONE };
    base(F::REG_WRITE | F::ALU_REQ_RS | F::ALU_SRC_IMM | ext, alu, RegDest::Rt)
}

/// Operates on HI/LO only.
fn hi_lo(alu: AluOp) -> Decoded {
    base(F::ALU_REQ_RS | F::ALU_REQ_RT, alu, RegDest::None)
}

fn load(ctl: AccessControl) -> Decoded {
    let merge = if matches!(ctl, AccessControl::WordLeft | AccessControl::WordRight) {
        F::ALU_REQ_RT
    } else {
        F::NONE
    };
    Decoded {
        mem_ctl: ctl,
        ..base(
            F::REG_WRITE | F::MEM_READ | F::ALU_REQ_RS | F::ALU_SRC_IMM | merge,
            AluOp::Addu,
            RegDest::Rt,
        )
    }
}

fn store(ctl: AccessControl) -> Decoded {
    Decoded {
        mem_ctl: ctl,
        ..base(
            F::MEM_WRITE | F::ALU_REQ_RS | F::ALU_REQ_RT | F::ALU_SRC_IMM,
            AluOp::Addu,
            RegDest::None,
        )
    }
}

fn branch(cond: BranchCond, negate: bool, likely: bool, link: bool) -> Decoded {
    let (flags, alu, dest) = if link {
        (F::REG_WRITE | F::LINK, AluOp::PassB, RegDest::Ra)
    } else {
        (F::NONE, AluOp::Nop, RegDest::None)
    };
    Decoded {
        flow: ControlFlow::Branch {
            cond,
            negate,
            likely,
        },
        ..base(flags, alu, dest)
    }
}

fn jump(flow: ControlFlow, dest: RegDest) -> Decoded {
    let (flags, alu) = if dest == RegDest::None {
        (F::NONE, AluOp::Nop)
    } else {
        (F::REG_WRITE | F::LINK, AluOp::PassB)
    };
    Decoded {
        flow,
        ..base(flags, alu, dest)
    }
}

fn trap(alu: AluOp, imm: bool) -> Decoded {
    if imm {
        base(F::ALU_REQ_RS | F::ALU_SRC_IMM, alu, RegDest::None)
    } else {
        base(F::ALU_REQ_RS | F::ALU_REQ_RT, alu, RegDest::None)
    }
}

fn exception(cause: ExceptionCause) -> Decoded {
    Decoded {
        excause: Some(cause),
        ..base(F::EXCEPTION, AluOp::Nop, RegDest::None)
    }
}

fn system(sys: SystemOp, flags: F, dest: RegDest) -> Decoded {
    Decoded {
        sys,
        ..base(flags, AluOp::Nop, dest)
    }
}

fn unsupported() -> Decoded {
    Decoded::default()
}

fn decode_special(inst: u32) -> Decoded {
    match inst.funct() {
        funct::SLL => shift_imm(AluOp::Sll),
        funct::SRL if inst.rs() == 1 => shift_imm(AluOp::Rotr),
        funct::SRL => shift_imm(AluOp::Srl),
        funct::SRA => shift_imm(AluOp::Sra),
        funct::SLLV => r_type(AluOp::Sllv),
        funct::SRLV if inst.shamt() == 1 => r_type(AluOp::Rotrv),
        funct::SRLV => r_type(AluOp::Srlv),
        funct::SRAV => r_type(AluOp::Srav),
        funct::JR => jump(ControlFlow::JumpRegister, RegDest::None),
        funct::JALR => jump(ControlFlow::JumpRegister, RegDest::Rd),
        funct::MOVZ => r_type(AluOp::Movz),
        funct::MOVN => r_type(AluOp::Movn),
        funct::SYSCALL => exception(ExceptionCause::Syscall),
        funct::BREAK => exception(ExceptionCause::Break),
        funct::SYNC => base(F::NONE, AluOp::Nop, RegDest::None),
        funct::MFHI => base(F::REG_WRITE, AluOp::Mfhi, RegDest::Rd),
        funct::MTHI => base(F::ALU_REQ_RS, AluOp::Mthi, RegDest::None),
        funct::MFLO => base(F::REG_WRITE, AluOp::Mflo, RegDest::Rd),
        funct::MTLO => base(F::ALU_REQ_RS, AluOp::Mtlo, RegDest::None),
        funct::MULT => hi_lo(AluOp::Mult),
        funct::MULTU => hi_lo(AluOp::Multu),
        funct::DIV => hi_lo(AluOp::Div),
        funct::DIVU => hi_lo(AluOp::Divu),
        funct::ADD => r_type(AluOp::Add),
        funct::ADDU => r_type(AluOp::Addu),
        funct::SUB => r_type(AluOp::Sub),
        funct::SUBU => r_type(AluOp::Subu),
        funct::AND => r_type(AluOp::And),
        funct::OR => r_type(AluOp::Or),
        funct::XOR => r_type(AluOp::Xor),
        funct::NOR => r_type(AluOp::Nor),
        funct::SLT => r_type(AluOp::Slt),
        funct::SLTU => r_type(AluOp::Sltu),
        funct::TGE => trap(AluOp::Tge, false),
        funct::TGEU => trap(AluOp::Tgeu, false),
        funct::TLT => trap(AluOp::Tlt, false),
        funct::TLTU => trap(AluOp::Tltu, false),
        funct::TEQ => trap(AluOp::Teq, false),
        funct::TNE => trap(AluOp::Tne, false),
        _ => unsupported(),
    }
}

fn decode_regimm(inst: u32) -> Decoded {
    use BranchCond::LessThanZero as Ltz;
    match inst.rt() {
        regimm::BLTZ => branch(Ltz, false, false, false),
        regimm::BGEZ => branch(Ltz, true, false, false),
        regimm::BLTZL => branch(Ltz, false, true, false),
        regimm::BGEZL => branch(Ltz, true, true, false),
        regimm::BLTZAL => branch(Ltz, false, false, true),
        regimm::BGEZAL => branch(Ltz, true, false, true),
        regimm::TGEI => trap(AluOp::Tge, true),
        regimm::TGEIU => trap(AluOp::Tgeu, true),
        regimm::TLTI => trap(AluOp::Tlt, true),
        regimm::TLTIU => trap(AluOp::Tltu, true),
        regimm::TEQI => trap(AluOp::Teq, true),
        regimm::TNEI => trap(AluOp::Tne, true),
        _ => unsupported(),
    }
}

fn decode_special2(inst: u32) -> Decoded {
    match inst.funct() {
        special2::MADD => hi_lo(AluOp::Madd),
        special2::MADDU => hi_lo(AluOp::Maddu),
        special2::MSUB => hi_lo(AluOp::Msub),
        special2::MSUBU => hi_lo(AluOp::Msubu),
        special2::MUL => r_type(AluOp::Mul),
        special2::CLZ => base(F::REG_WRITE | F::ALU_REQ_RS, AluOp::Clz, RegDest::Rd),
        special2::CLO => base(F::REG_WRITE | F::ALU_REQ_RS, AluOp::Clo, RegDest::Rd),
        _ => unsupported(),
    }
}

fn decode_special3(inst: u32) -> Decoded {
    match (inst.funct(), inst.shamt()) {
        (special3::BSHFL, special3::SEB) => shift_imm(AluOp::Seb),
        (special3::BSHFL, special3::SEH) => shift_imm(AluOp::Seh),
        (special3::BSHFL, special3::WSBH) => shift_imm(AluOp::Wsbh),
        (special3::RDHWR, _) => system(SystemOp::Rdhwr, F::REG_WRITE, RegDest::Rt),
        _ => unsupported(),
    }
}

fn decode_cop0(inst: u32) -> Decoded {
    match inst.rs() {
        cop0::MFC0 => system(SystemOp::Mfc0, F::REG_WRITE, RegDest::Rt),
        cop0::MTC0 => system(SystemOp::Mtc0, F::ALU_REQ_RT | F::STOP_IF, RegDest::None),
        rs if rs >= cop0::CO && inst.funct() == cop0::ERET => {
            system(SystemOp::Eret, F::STOP_IF, RegDest::None)
        }
        _ => unsupported(),
    }
}

/// Decodes one instruction word.
///
/// # Examples
///
/// ```
/// use mipsim_core::core::pipeline::signals::AluOp;
/// use mipsim_core::isa::decode::decode;
///
/// // addiu $t0, $zero, 5
/// let d = decode(0x2408_0005);
/// assert!(d.is_supported());
/// assert_eq!(d.alu, AluOp::Addu);
///
/// assert!(!decode(0xfc00_0000).is_supported());
/// ```
pub fn decode(inst: u32) -> Decoded {
    use BranchCond::{Equal, LessOrEqualZero};
    match inst.opcode() {
        opcodes::OP_SPECIAL => decode_special(inst),
        opcodes::OP_REGIMM => decode_regimm(inst),
        opcodes::OP_J => jump(ControlFlow::Jump, RegDest::None),
        opcodes::OP_JAL => jump(ControlFlow::Jump, RegDest::Ra),
        opcodes::OP_BEQ => branch(Equal, false, false, false),
        opcodes::OP_BNE => branch(Equal, true, false, false),
        opcodes::OP_BLEZ => branch(LessOrEqualZero, false, false, false),
        opcodes::OP_BGTZ => branch(LessOrEqualZero, true, false, false),
        opcodes::OP_BEQL => branch(Equal, false, true, false),
        opcodes::OP_BNEL => branch(Equal, true, true, false),
        opcodes::OP_BLEZL => branch(LessOrEqualZero, false, true, false),
        opcodes::OP_BGTZL => branch(LessOrEqualZero, true, true, false),
        opcodes::OP_ADDI => i_type(AluOp::Add, false),
        opcodes::OP_ADDIU => i_type(AluOp::Addu, false),
        opcodes::OP_SLTI => i_type(AluOp::Slt, false),
        opcodes::OP_SLTIU => i_type(AluOp::Sltu, false),
        opcodes::OP_ANDI => i_type(AluOp::And, true),
        opcodes::OP_ORI => i_type(AluOp::Or, true),
        opcodes::OP_XORI => i_type(AluOp::Xor, true),
        opcodes::OP_LUI => base(F::REG_WRITE | F::ALU_SRC_IMM | F::ZERO_EXT_IMM, AluOp::Lui, RegDest::Rt),
        opcodes::OP_COP0 => decode_cop0(inst),
        opcodes::OP_SPECIAL2 => decode_special2(inst),
        opcodes::OP_SPECIAL3 => decode_special3(inst),
        opcodes::OP_LB => load(AccessControl::Byte),
        opcodes::OP_LH => load(AccessControl::Half),
        opcodes::OP_LWL => load(AccessControl::WordLeft),
        opcodes::OP_LW => load(AccessControl::Word),
        opcodes::OP_LBU => load(AccessControl::ByteUnsigned),
        opcodes::OP_LHU => load(AccessControl::HalfUnsigned),
        opcodes::OP_LWR => load(AccessControl::WordRight),
        opcodes::OP_SB => store(AccessControl::Byte),
        opcodes::OP_SH => store(AccessControl::Half),
        opcodes::OP_SWL => store(AccessControl::WordLeft),
        opcodes::OP_SW => store(AccessControl::Word),
        opcodes::OP_SWR => store(AccessControl::WordRight),
        opcodes::OP_CACHE => Decoded {
            mem_ctl: AccessControl::CacheOp,
            ..base(F::ALU_REQ_RS | F::ALU_SRC_IMM, AluOp::Addu, RegDest::None)
        },
        opcodes::OP_LL => load(AccessControl::LoadLinked),
        opcodes::OP_SC => Decoded {
            mem_ctl: AccessControl::StoreConditional,
            ..base(
                F::REG_WRITE | F::MEM_WRITE | F::ALU_REQ_RS | F::ALU_REQ_RT | F::ALU_SRC_IMM,
                AluOp::Addu,
                RegDest::Rt,
            )
        },
        _ => unsupported(),
    }
}

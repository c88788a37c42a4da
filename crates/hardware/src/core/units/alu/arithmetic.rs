//! ALU arithmetic operations.
//!
//! Implements addition and subtraction with the signed overflow check and the HI/LO
//! multiply/divide family.
//!
//! HI/LO live in the register file. A division by zero leaves both unchanged; the
//! architecture calls the result unpredictable.

use super::AluOutcome;
use crate::common::{ExceptionCause, RegisterFile};

/// Number of bits in a 32-bit word (used for the HI half of a product).
const WORD_BITS: u32 = 32;

/// How a product combines with the HI/LO accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accumulate {
    /// `MULT`/`MULTU`: replace.
    Set,
    /// `MADD`/`MADDU`: add to the accumulator.
    Add,
    /// `MSUB`/`MSUBU`: subtract from the accumulator.
    Sub,
}

fn read_acc(regs: &RegisterFile) -> u64 {
    (regs.read_hi_lo(true) << WORD_BITS) | (regs.read_hi_lo(false) & 0xffff_ffff)
}

fn write_acc(regs: &mut RegisterFile, acc: u64) {
    regs.write_hi_lo(true, acc >> WORD_BITS);
    regs.write_hi_lo(false, acc & 0xffff_ffff);
}

/// 64-bit two's complement product of the signed operands.
pub fn signed_product(a: u32, b: u32) -> u64 {
    (i64::from(a as i32) * i64::from(b as i32)) as u64
}

/// 64-bit product of the unsigned operands.
pub fn unsigned_product(a: u32, b: u32) -> u64 {
    u64::from(a) * u64::from(b)
}

/// `ADD`: signed add, reporting [`ExceptionCause::Overflow`].
pub const fn add(a: u32, b: u32) -> AluOutcome {
    match (a as i32).checked_add(b as i32) {
        Some(v) => AluOutcome::value(v as u32),
        None => AluOutcome::exception(ExceptionCause::Overflow),
    }
}

/// `SUB`: signed subtract, reporting [`ExceptionCause::Overflow`].
pub const fn sub(a: u32, b: u32) -> AluOutcome {
    match (a as i32).checked_sub(b as i32) {
        Some(v) => AluOutcome::value(v as u32),
        None => AluOutcome::exception(ExceptionCause::Overflow),
    }
}

/// Reads HI (`hi == true`) or LO.
pub fn move_from(regs: &RegisterFile, hi: bool) -> AluOutcome {
    AluOutcome::value(regs.read_hi_lo(hi) as u32)
}

/// Writes `a` to HI (`hi == true`) or LO.
pub fn move_to(regs: &mut RegisterFile, hi: bool, a: u32) -> AluOutcome {
    regs.write_hi_lo(hi, u64::from(a));
    AluOutcome::value(0)
}

/// Folds `product` into HI/LO according to `mode`.
pub fn multiply(regs: &mut RegisterFile, product: u64, mode: Accumulate) -> AluOutcome {
    let acc = match mode {
        Accumulate::Set => product,
        Accumulate::Add => read_acc(regs).wrapping_add(product),
        Accumulate::Sub => read_acc(regs).wrapping_sub(product),
    };
    write_acc(regs, acc);
    AluOutcome::value(0)
}

/// `DIV`/`DIVU`: LO gets the quotient, HI the remainder.
pub fn divide(regs: &mut RegisterFile, a: u32, b: u32, signed: bool) -> AluOutcome {
    if b == 0 {
        return AluOutcome::value(0);
    }
    let (quot, rem) = if signed {
        let (n, d) = (a as i32, b as i32);
        (n.wrapping_div(d) as u32, n.wrapping_rem(d) as u32)
    } else {
        (a / b, a % b)
    };
    regs.write_hi_lo(false, u64::from(quot));
    regs.write_hi_lo(true, u64::from(rem));
    AluOutcome::value(0)
}

//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage. Operands and
//! results are 32-bit words; the HI/LO accumulator pair is the only state the ALU may
//! touch, and only for the multiply/divide family.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, the multiply/divide family, HI/LO moves
//! - [`logic`]:      Slt, Movz, Movn, traps, byte shuffles
//! - [`shifts`]:     Sll, Srl, Sra, Rotr (fixed and variable amounts)
//!
//! [`Alu::evaluate`] matches every [`AluOp`] explicitly, so adding an operation without
//! implementing it fails to compile.

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Comparison, conditional-move, trap and byte-shuffle helpers.
pub mod logic;

/// Shift and rotate operations.
pub mod shifts;

use crate::common::{ExceptionCause, RegisterFile};
use crate::core::pipeline::signals::AluOp;

/// Result of one ALU evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AluOutcome {
    /// Computed value.
    pub value: u32,
    /// The register write must be dropped (`MOVZ`/`MOVN` with a false condition).
    pub discard: bool,
    /// Architectural condition raised by the operation.
    pub excause: Option<ExceptionCause>,
}

impl AluOutcome {
    /// A plain result.
    #[inline]
    pub const fn value(value: u32) -> Self {
        Self {
            value,
            discard: false,
            excause: None,
        }
    }

    /// A result whose register write is cancelled.
    #[inline]
    pub const fn discarded() -> Self {
        Self {
            value: 0,
            discard: true,
            excause: None,
        }
    }

    /// An operation that raised `cause`.
    #[inline]
    pub const fn exception(cause: ExceptionCause) -> Self {
        Self {
            value: 0,
            discard: false,
            excause: Some(cause),
        }
    }
}

/// Arithmetic Logic Unit for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Evaluates an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op`   - The ALU operation to perform
    /// * `a`    - First operand (`rs`)
    /// * `b`    - Second operand (`rt` or the extended immediate)
    /// * `sa`   - Shift amount field for the fixed shifts
    /// * `regs` - Register file, for the HI/LO side effects
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::common::{ExceptionCause, RegisterFile};
    /// use mipsim_core::core::pipeline::signals::AluOp;
    /// use mipsim_core::core::units::alu::Alu;
    ///
    /// let mut regs = RegisterFile::new();
    ///
    /// assert_eq!(Alu::evaluate(AluOp::Addu, 40, 2, 0, &mut regs).value, 42);
    ///
    /// let ov = Alu::evaluate(AluOp::Add, 0x7fff_ffff, 1, 0, &mut regs);
    /// assert_eq!(ov.excause, Some(ExceptionCause::Overflow));
    ///
    /// assert_eq!(Alu::evaluate(AluOp::Sll, 0, 1, 4, &mut regs).value, 0x10);
    /// ```
    pub fn evaluate(op: AluOp, a: u32, b: u32, sa: u8, regs: &mut RegisterFile) -> AluOutcome {
        use arithmetic::Accumulate;

        let sa = u32::from(sa);
        match op {
            AluOp::Nop => AluOutcome::value(0),
            AluOp::PassB => AluOutcome::value(b),

            AluOp::Sll => AluOutcome::value(shifts::sll(b, sa)),
            AluOp::Srl => AluOutcome::value(shifts::srl(b, sa)),
            AluOp::Sra => AluOutcome::value(shifts::sra(b, sa)),
            AluOp::Rotr => AluOutcome::value(shifts::rotr(b, sa)),
            AluOp::Sllv => AluOutcome::value(shifts::sll(b, a)),
            AluOp::Srlv => AluOutcome::value(shifts::srl(b, a)),
            AluOp::Srav => AluOutcome::value(shifts::sra(b, a)),
            AluOp::Rotrv => AluOutcome::value(shifts::rotr(b, a)),

            AluOp::Add => arithmetic::add(a, b),
            AluOp::Sub => arithmetic::sub(a, b),
            AluOp::Addu => AluOutcome::value(a.wrapping_add(b)),
            AluOp::Subu => AluOutcome::value(a.wrapping_sub(b)),

            AluOp::Mfhi => arithmetic::move_from(regs, true),
            AluOp::Mflo => arithmetic::move_from(regs, false),
            AluOp::Mthi => arithmetic::move_to(regs, true, a),
            AluOp::Mtlo => arithmetic::move_to(regs, false, a),

            AluOp::Mult => {
                arithmetic::multiply(regs, arithmetic::signed_product(a, b), Accumulate::Set)
            }
            AluOp::Multu => {
                arithmetic::multiply(regs, arithmetic::unsigned_product(a, b), Accumulate::Set)
            }
            AluOp::Madd => {
                arithmetic::multiply(regs, arithmetic::signed_product(a, b), Accumulate::Add)
            }
            AluOp::Maddu => {
                arithmetic::multiply(regs, arithmetic::unsigned_product(a, b), Accumulate::Add)
            }
            AluOp::Msub => {
                arithmetic::multiply(regs, arithmetic::signed_product(a, b), Accumulate::Sub)
            }
            AluOp::Msubu => {
                arithmetic::multiply(regs, arithmetic::unsigned_product(a, b), Accumulate::Sub)
            }
            AluOp::Mul => AluOutcome::value(arithmetic::signed_product(a, b) as u32),
            AluOp::Div => arithmetic::divide(regs, a, b, true),
            AluOp::Divu => arithmetic::divide(regs, a, b, false),

            AluOp::Clz => AluOutcome::value(a.leading_zeros()),
            AluOp::Clo => AluOutcome::value(a.leading_ones()),

            AluOp::And => AluOutcome::value(a & b),
            AluOp::Or => AluOutcome::value(a | b),
            AluOp::Xor => AluOutcome::value(a ^ b),
            AluOp::Nor => AluOutcome::value(!(a | b)),
            AluOp::Slt => AluOutcome::value(logic::slt(a, b)),
            AluOp::Sltu => AluOutcome::value(u32::from(a < b)),
            AluOp::Lui => AluOutcome::value(b << 16),

            AluOp::Movz => logic::conditional_move(a, b == 0),
            AluOp::Movn => logic::conditional_move(a, b != 0),

            AluOp::Seb => AluOutcome::value(logic::seb(b)),
            AluOp::Seh => AluOutcome::value(logic::seh(b)),
            AluOp::Wsbh => AluOutcome::value(logic::wsbh(b)),

            AluOp::Teq => logic::trap_if(a == b),
            AluOp::Tne => logic::trap_if(a != b),
            AluOp::Tge => logic::trap_if((a as i32) >= (b as i32)),
            AluOp::Tgeu => logic::trap_if(a >= b),
            AluOp::Tlt => logic::trap_if((a as i32) < (b as i32)),
            AluOp::Tltu => logic::trap_if(a < b),
        }
    }
}

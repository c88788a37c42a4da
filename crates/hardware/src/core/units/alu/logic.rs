//! ALU logical and comparison operations.
//!
//! Set-less-than, the conditional moves, the conditional traps and the `BSHFL` byte
//! shuffles. None of them touches HI/LO. The plain bitwise operations are one-liners
//! in [`super::Alu::evaluate`].

use super::AluOutcome;
use crate::common::ExceptionCause;

/// Raises [`ExceptionCause::Trap`] when `cond` holds.
pub const fn trap_if(cond: bool) -> AluOutcome {
    if cond {
        AluOutcome::exception(ExceptionCause::Trap)
    } else {
        AluOutcome::value(0)
    }
}

/// `MOVZ`/`MOVN`: passes `a` through when `take` holds, otherwise cancels the write.
pub const fn conditional_move(a: u32, take: bool) -> AluOutcome {
    if take {
        AluOutcome::value(a)
    } else {
        AluOutcome::discarded()
    }
}

/// Signed less-than as `0`/`1`.
pub fn slt(a: u32, b: u32) -> u32 {
    u32::from((a as i32) < (b as i32))
}

/// Sign-extends the low byte.
pub fn seb(b: u32) -> u32 {
    i32::from(b as u8 as i8) as u32
}

/// Sign-extends the low half-word.
pub fn seh(b: u32) -> u32 {
    i32::from(b as u16 as i16) as u32
}

/// Swaps the bytes inside each half-word.
pub const fn wsbh(b: u32) -> u32 {
    ((b & 0x00ff_00ff) << 8) | ((b >> 8) & 0x00ff_00ff)
}

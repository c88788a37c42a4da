//! ALU shift operations.
//!
//! The shifted value is always `rt` (operand `b`). Fixed forms take the amount from the
//! `sa` field; variable forms use the low five bits of `rs` (operand `a`). Every helper
//! masks the amount, so callers pass either source unmodified.

/// Mask for the 5-bit shift amount.
const SHAMT_MASK: u32 = 0x1f;

/// Shift left logical.
pub const fn sll(value: u32, amount: u32) -> u32 {
    value << (amount & SHAMT_MASK)
}

/// Shift right logical.
pub const fn srl(value: u32, amount: u32) -> u32 {
    value >> (amount & SHAMT_MASK)
}

/// Shift right arithmetic.
pub const fn sra(value: u32, amount: u32) -> u32 {
    ((value as i32) >> (amount & SHAMT_MASK)) as u32
}

/// Rotate right.
pub const fn rotr(value: u32, amount: u32) -> u32 {
    value.rotate_right(amount & SHAMT_MASK)
}

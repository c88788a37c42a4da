//! Unaligned word access handling.
//!
//! `LWL`/`LWR`/`SWL`/`SWR` touch only the aligned word that contains the effective
//! address and merge part of it with the register (loads) or with the existing memory
//! word (stores). The modeled target is big-endian, so "left" is the most-significant
//! end of the register.

/// Word-aligned base of `addr`.
#[inline]
pub const fn word_base(addr: u64) -> u64 {
    addr & !3
}

/// Byte offset of `addr` inside its word, in bits.
#[inline]
const fn offset_bits(addr: u64) -> u32 {
    ((addr & 3) as u32) * 8
}

/// `LWL`: loads the bytes from `addr` to the end of its word into the high end of `reg`.
///
/// # Arguments
///
/// * `mem`  - The aligned memory word containing `addr`.
/// * `reg`  - Current value of the target register.
/// * `addr` - Effective (unaligned) address.
pub const fn load_left(mem: u32, reg: u32, addr: u64) -> u32 {
    let sh = offset_bits(addr);
    let keep = (1u32 << sh).wrapping_sub(1);
    (mem << sh) | (reg & keep)
}

/// `LWR`: loads the bytes from the start of the word up to `addr` into the low end of `reg`.
pub const fn load_right(mem: u32, reg: u32, addr: u64) -> u32 {
    let sh = 24 - offset_bits(addr);
    let take = u32::MAX >> sh;
    (mem >> sh) | (reg & !take)
}

/// `SWL`: stores the high end of `reg` into the bytes from `addr` to the end of its word.
///
/// Returns the merged word to write back at [`word_base`].
pub const fn store_left(mem: u32, reg: u32, addr: u64) -> u32 {
    let sh = offset_bits(addr);
    let put = u32::MAX >> sh;
    (reg >> sh) | (mem & !put)
}

/// `SWR`: stores the low end of `reg` into the bytes from the start of the word up to `addr`.
pub const fn store_right(mem: u32, reg: u32, addr: u64) -> u32 {
    let sh = 24 - offset_bits(addr);
    let keep = (1u32 << sh).wrapping_sub(1);
    (reg << sh) | (mem & keep)
}

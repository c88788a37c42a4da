//! Load/Store Unit Tests.
//!
//! Verifies widths and sign extension, alignment faults, bus errors, the unaligned
//! word merges and the `LL`/`SC` reservation.

use mipsim_core::common::{AccessOptions, ExceptionCause, SimError};
use mipsim_core::core::pipeline::signals::AccessControl;
use mipsim_core::core::units::lsu::Lsu;
use mipsim_core::core::units::lsu::atomic::Reservation;
use mipsim_core::soc::{Memory, MemoryAccess};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::mocks::memory::MockMemory;

const BASE: u64 = 0x1000;

fn memory_with(words: &[u32]) -> Memory {
    let mut mem = Memory::new();
    let image: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    mem.load(BASE, &image).unwrap();
    mem
}

fn load(mem: &mut dyn MemoryAccess, ctl: AccessControl, addr: u64) -> Result<u32, ExceptionCause> {
    Lsu::load(mem, ctl, addr, 0, &mut Reservation::default()).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Widths
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(AccessControl::Word, BASE, 0x80ff_7f01)]
#[case(AccessControl::Byte, BASE, 0xffff_ff80)]
#[case(AccessControl::ByteUnsigned, BASE, 0x80)]
#[case(AccessControl::Byte, BASE + 2, 0x7f)]
#[case(AccessControl::Half, BASE, 0xffff_80ff)]
#[case(AccessControl::HalfUnsigned, BASE, 0x80ff)]
#[case(AccessControl::Half, BASE + 2, 0x7f01)]
fn loads_extend_to_32_bits(#[case] ctl: AccessControl, #[case] addr: u64, #[case] expected: u32) {
    let mut mem = memory_with(&[0x80ff_7f01]);
    assert_eq!(load(&mut mem, ctl, addr), Ok(expected));
}

#[test]
fn narrow_stores_touch_only_their_bytes() {
    let mut mem = memory_with(&[0x1122_3344]);
    let mut res = Reservation::default();
    let out = Lsu::store(&mut mem, AccessControl::Byte, BASE + 1, 0xabcd_ef99, &mut res).unwrap();
    assert_eq!(out, Ok(None));
    let _ = Lsu::store(&mut mem, AccessControl::Half, BASE + 2, 0x0000_beef, &mut res).unwrap();
    assert_eq!(mem.read_u32(BASE, AccessOptions::REGULAR).unwrap(), 0x1199_beef);
}

// ══════════════════════════════════════════════════════════
// 2. Faults
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(AccessControl::Word, 2)]
#[case(AccessControl::Half, 1)]
#[case(AccessControl::LoadLinked, 1)]
fn misaligned_load_is_an_address_error(#[case] ctl: AccessControl, #[case] offset: u64) {
    let mut mem = memory_with(&[0]);
    assert_eq!(load(&mut mem, ctl, BASE + offset), Err(ExceptionCause::AddrLoad));
}

#[rstest]
#[case(AccessControl::Word, 1)]
#[case(AccessControl::Half, 3)]
#[case(AccessControl::StoreConditional, 2)]
fn misaligned_store_is_an_address_error(#[case] ctl: AccessControl, #[case] offset: u64) {
    let mut mem = memory_with(&[0]);
    let out = Lsu::store(&mut mem, ctl, BASE + offset, 1, &mut Reservation::default()).unwrap();
    assert_eq!(out, Err(ExceptionCause::AddrStore));
}

#[test]
fn unaligned_kinds_never_fault_on_alignment() {
    let mut mem = memory_with(&[0x1122_3344]);
    assert!(load(&mut mem, AccessControl::WordLeft, BASE + 3).is_ok());
    assert!(load(&mut mem, AccessControl::WordRight, BASE + 1).is_ok());
}

#[test]
fn unmapped_access_is_a_bus_error() {
    let mut mem = MockMemory::new(16, BASE);
    let mut res = Reservation::default();
    assert_eq!(load(&mut mem, AccessControl::Word, 0x10), Err(ExceptionCause::DBus));
    let out = Lsu::store(&mut mem, AccessControl::Word, 0x10, 1, &mut res).unwrap();
    assert_eq!(out, Err(ExceptionCause::DBus));
    let log = mem.log();
    assert_eq!(log.borrow().writes, 0);
}

#[test]
fn access_past_the_address_space_is_a_host_error() {
    let mut mem = Memory::new();
    let res = Lsu::load(
        &mut mem,
        AccessControl::Word,
        0xffff_fffc + 4,
        0,
        &mut Reservation::default(),
    );
    assert!(matches!(res, Err(SimError::Memory(_))));
}

#[test]
fn composite_kind_on_plain_path_is_rejected() {
    let mut mem = memory_with(&[0]);
    let res = Lsu::load(&mut mem, AccessControl::CacheOp, BASE, 0, &mut Reservation::default());
    assert!(matches!(res, Err(SimError::UnsupportedAccessControl("cache-op"))));
}

// ══════════════════════════════════════════════════════════
// 3. Unaligned words (big-endian)
// ══════════════════════════════════════════════════════════

#[test]
fn lwl_lwr_assemble_a_word_spanning_two_words() {
    let mut mem = memory_with(&[0x1122_3344, 0x5566_7788]);
    let mut res = Reservation::default();
    // Unaligned word at BASE + 1: LWL at the low address, LWR at the high one.
    let hi = Lsu::load(&mut mem, AccessControl::WordLeft, BASE + 1, 0xdead_beef, &mut res)
        .unwrap()
        .unwrap();
    assert_eq!(hi, 0x2233_44ef);
    let full = Lsu::load(&mut mem, AccessControl::WordRight, BASE + 4, hi, &mut res)
        .unwrap()
        .unwrap();
    assert_eq!(full, 0x2233_4455);
}

#[test]
fn swl_swr_scatter_a_word_across_two_words() {
    let mut mem = memory_with(&[0xaaaa_aaaa, 0xbbbb_bbbb]);
    let mut res = Reservation::default();
    let _ = Lsu::store(&mut mem, AccessControl::WordLeft, BASE + 2, 0x1122_3344, &mut res)
        .unwrap()
        .unwrap();
    let _ = Lsu::store(&mut mem, AccessControl::WordRight, BASE + 5, 0x1122_3344, &mut res)
        .unwrap()
        .unwrap();
    assert_eq!(mem.read_u32(BASE, AccessOptions::REGULAR).unwrap(), 0xaaaa_1122);
    assert_eq!(mem.read_u32(BASE + 4, AccessOptions::REGULAR).unwrap(), 0x3344_bbbb);
}

// ══════════════════════════════════════════════════════════
// 4. LL / SC
// ══════════════════════════════════════════════════════════

#[test]
fn store_conditional_succeeds_after_load_linked() {
    let mut mem = memory_with(&[7]);
    let mut res = Reservation::default();
    let v = Lsu::load(&mut mem, AccessControl::LoadLinked, BASE, 0, &mut res).unwrap();
    assert_eq!(v, Ok(7));
    assert_eq!(res.address(), Some(BASE));

    let flag = Lsu::store(&mut mem, AccessControl::StoreConditional, BASE, 8, &mut res).unwrap();
    assert_eq!(flag, Ok(Some(1)));
    assert_eq!(mem.read_u32(BASE, AccessOptions::REGULAR).unwrap(), 8);
    assert_eq!(res.address(), None, "SC consumes the reservation");
}

#[test]
fn store_conditional_without_reservation_fails_and_stores_nothing() {
    let mut mem = memory_with(&[7]);
    let mut res = Reservation::default();
    let flag = Lsu::store(&mut mem, AccessControl::StoreConditional, BASE, 8, &mut res).unwrap();
    assert_eq!(flag, Ok(Some(0)));
    assert_eq!(mem.read_u32(BASE, AccessOptions::REGULAR).unwrap(), 7);
}

#[test]
fn store_conditional_to_another_word_fails() {
    let mut mem = memory_with(&[7, 9]);
    let mut res = Reservation::default();
    let _ = Lsu::load(&mut mem, AccessControl::LoadLinked, BASE, 0, &mut res).unwrap();
    let flag = Lsu::store(&mut mem, AccessControl::StoreConditional, BASE + 4, 1, &mut res)
        .unwrap();
    assert_eq!(flag, Ok(Some(0)));
    assert_eq!(mem.read_u32(BASE + 4, AccessOptions::REGULAR).unwrap(), 9);

    let again = Lsu::store(&mut mem, AccessControl::StoreConditional, BASE, 1, &mut res).unwrap();
    assert_eq!(again, Ok(Some(0)), "a failed SC still consumed the reservation");
}

#[test]
fn reservation_tracks_word_granularity() {
    let mut res = Reservation::default();
    res.acquire(0x2002);
    assert_eq!(res.address(), Some(0x2000));
    assert!(res.try_commit(0x2000));
    assert!(!res.try_commit(0x2000));
    res.acquire(0x2000);
    res.clear();
    assert!(!res.try_commit(0x2000));
}

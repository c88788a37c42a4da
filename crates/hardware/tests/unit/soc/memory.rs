//! Backing Memory Tests.

use mipsim_core::common::constants::ADDRESS_SPACE_END;
use mipsim_core::common::{AccessOptions, MemoryError};
use mipsim_core::soc::memory::buffer::{BLOCK_SIZE, SparseBuffer};
use mipsim_core::soc::{LocationStatus, Memory, MemoryAccess};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const OPTS: AccessOptions = AccessOptions::REGULAR;

// ══════════════════════════════════════════════════════════
// 1. Sparse buffer
// ══════════════════════════════════════════════════════════

#[test]
fn unwritten_locations_read_zero_without_allocating() {
    let mut buf = SparseBuffer::new();
    let mut dest = [0xffu8; 8];
    buf.read_slice(0x1234_5678, &mut dest);
    assert_eq!(dest, [0; 8]);

    assert!(!buf.write_u8(0x10, 0), "writing zero to a fresh block changes nothing");
    assert_eq!(buf.allocated_blocks(), 0);
}

#[test]
fn write_reports_changes() {
    let mut buf = SparseBuffer::new();
    assert!(buf.write_slice(0x40, &[1, 2, 3]));
    assert!(!buf.write_slice(0x40, &[1, 2, 3]), "same bytes again");
    assert!(buf.write_slice(0x40, &[1, 9, 3]));
    assert_eq!(buf.read_u8(0x41), 9);
}

#[test]
fn slice_crossing_a_block_boundary_allocates_both() {
    let mut buf = SparseBuffer::new();
    let edge = BLOCK_SIZE as u64 - 2;
    let _ = buf.write_slice(edge, &[1, 2, 3, 4]);
    assert_eq!(buf.allocated_blocks(), 2);

    let mut dest = [0u8; 4];
    buf.read_slice(edge, &mut dest);
    assert_eq!(dest, [1, 2, 3, 4]);

    buf.clear();
    assert_eq!(buf.allocated_blocks(), 0);
    assert_eq!(buf.read_u8(edge), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Memory
// ══════════════════════════════════════════════════════════

#[test]
fn words_are_big_endian() {
    let mut mem = Memory::new();
    mem.write_u32(0x100, 0x1122_3344, OPTS).unwrap();
    assert_eq!(mem.read_u8(0x100, OPTS).unwrap(), 0x11);
    assert_eq!(mem.read_u16(0x102, OPTS).unwrap(), 0x3344);

    mem.write_u16(0x200, 0xbeef, OPTS).unwrap();
    assert_eq!(mem.read_u32(0x200, OPTS).unwrap(), 0xbeef_0000);
}

#[test]
fn write_result_counts_bytes_and_changes() {
    let mut mem = Memory::new();
    let first = mem.write(0x10, &[7, 7], OPTS).unwrap();
    assert_eq!((first.n_bytes, first.changed), (2, true));
    let again = mem.write(0x10, &[7, 7], OPTS).unwrap();
    assert!(!again.changed);
}

#[test]
fn accesses_past_four_gib_are_out_of_range() {
    let mut mem = Memory::new();
    let last = ADDRESS_SPACE_END - 1;
    mem.write_u8(last, 0xaa, OPTS).unwrap();
    assert_eq!(mem.read_u8(last, OPTS).unwrap(), 0xaa);

    assert_eq!(
        mem.read_u32(last - 1, OPTS),
        Err(MemoryError::OutOfRange { addr: last - 1, len: 4 })
    );
    assert_eq!(
        mem.load(last, &[1, 2]),
        Err(MemoryError::OutOfRange { addr: last, len: 2 })
    );
    assert_eq!(mem.location_status(last), LocationStatus::NONE);
    assert_eq!(mem.location_status(ADDRESS_SPACE_END), LocationStatus::ILLEGAL);
}

#[test]
fn reset_zeroes_everything() {
    let mut mem = Memory::new();
    mem.load(0x8002_0000, &[1, 2, 3, 4]).unwrap();
    assert_eq!(mem.buffer().allocated_blocks(), 1);

    mem.reset();
    assert_eq!(mem.read_u32(0x8002_0000, OPTS).unwrap(), 0);
}

proptest! {
    #[test]
    fn last_write_wins(addr in 0u64..0x1_0000, first in any::<u32>(), second in any::<u32>()) {
        let mut mem = Memory::new();
        mem.write_u32(addr, first, OPTS).unwrap();
        mem.write_u32(addr, second, OPTS).unwrap();
        prop_assert_eq!(mem.read_u32(addr, OPTS).unwrap(), second);
    }
}

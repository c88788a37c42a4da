//! Physical Address Router Tests.

use std::cell::RefCell;
use std::rc::Rc;

use mipsim_core::common::{AccessOptions, MemoryError, SimError};
use mipsim_core::soc::{LocationStatus, Memory, MemoryAccess, PhysAddrSpace};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::mocks::memory::{AccessLog, MockMemory};

const OPTS: AccessOptions = AccessOptions::REGULAR;

/// RAM at `0x0..=0xfff` and a logged device at `0x1000..=0x10ff`.
fn two_ranges() -> (PhysAddrSpace, Rc<RefCell<AccessLog>>) {
    let mut space = PhysAddrSpace::new();
    space.insert_range("ram", 0, 0xfff, Box::new(Memory::new())).unwrap();
    let device = MockMemory::new(0x100, 0);
    let log = device.log();
    space.insert_range("dev", 0x1000, 0x10ff, Box::new(device)).unwrap();
    (space, log)
}

#[test]
fn device_sees_range_relative_offsets() {
    let (mut space, log) = two_ranges();
    space.write_u32(0x1010, 0xcafe_f00d, OPTS).unwrap();
    assert_eq!(log.borrow().last_write, Some((0x10, 4)));
    assert_eq!(space.read_u32(0x1010, OPTS).unwrap(), 0xcafe_f00d);
    assert_eq!(space.read_u32(0x10, OPTS).unwrap(), 0, "RAM untouched");
}

#[test]
fn access_spanning_a_boundary_is_split() {
    let (mut space, log) = two_ranges();
    let res = space.write(0xffe, &[1, 2, 3, 4], OPTS).unwrap();
    assert_eq!(res.n_bytes, 4);
    assert_eq!(log.borrow().last_write, Some((0, 2)));

    let mut dest = [0u8; 4];
    space.read(&mut dest, 0xffe, OPTS).unwrap();
    assert_eq!(dest, [1, 2, 3, 4]);
}

#[test]
fn unmapped_addresses_fail_and_are_illegal() {
    let (mut space, _) = two_ranges();
    assert_eq!(
        space.read_u32(0x2000, OPTS),
        Err(MemoryError::Unmapped { addr: 0x2000 })
    );
    // The first unmapped byte is reported for a partially mapped access.
    assert_eq!(
        space.write_u32(0x10fe, 0, OPTS),
        Err(MemoryError::Unmapped { addr: 0x1100 })
    );
    assert_eq!(space.location_status(0x2000), LocationStatus::ILLEGAL);
    assert_eq!(space.location_status(0x20), LocationStatus::NONE);
}

#[rstest]
#[case::overlap_start(0x0f00, 0x1000)]
#[case::overlap_inside(0x1010, 0x1020)]
#[case::covering(0x0, 0x2000)]
fn overlapping_ranges_are_rejected(#[case] start: u64, #[case] last: u64) {
    let (mut space, _) = two_ranges();
    let err = space.insert_range("late", start, last, Box::new(Memory::new())).unwrap_err();
    assert!(matches!(err, SimError::InvalidMemoryMap(msg) if msg.contains("overlaps")));
}

#[test]
fn empty_range_is_rejected() {
    let mut space = PhysAddrSpace::new();
    let err = space.insert_range("bad", 0x10, 0x0f, Box::new(Memory::new())).unwrap_err();
    assert!(matches!(err, SimError::InvalidMemoryMap(msg) if msg.contains("empty")));
}

#[test]
fn ranges_can_be_found_and_removed() {
    let (mut space, _) = two_ranges();
    assert_eq!(space.find_range(0x1080), Some(("dev", 0x1000, 0x10ff)));
    assert_eq!(space.find_range(0x5000), None);

    assert!(space.remove_range("dev").is_some());
    assert!(space.remove_range("dev").is_none());
    assert_eq!(space.find_range(0x1080), None);
    assert!(space.read_u8(0x1080, OPTS).is_err());

    // The hole can be mapped again.
    space.insert_range("dev2", 0x1000, 0x1fff, Box::new(Memory::new())).unwrap();
    space.write_u8(0x1fff, 5, OPTS).unwrap();
    assert_eq!(space.read_u8(0x1fff, OPTS).unwrap(), 5);
}

#[test]
fn ranges_are_routed_regardless_of_insertion_order() {
    let mut space = PhysAddrSpace::new();
    space.insert_range("high", 0x100, 0x1ff, Box::new(Memory::new())).unwrap();
    space.insert_range("low", 0x0, 0xff, Box::new(Memory::new())).unwrap();
    space.write_u32(0xfe, 0x0102_0304, OPTS).unwrap();
    assert_eq!(space.read_u32(0xfe, OPTS).unwrap(), 0x0102_0304);
    assert_eq!(space.find_range(0xff).map(|r| r.0), Some("low"));
    assert_eq!(space.find_range(0x100).map(|r| r.0), Some("high"));
}

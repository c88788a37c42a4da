//! Image Loader Tests.

use std::io::Write;

use mipsim_core::common::{AccessOptions, MemoryError, SimError};
use mipsim_core::sim::loader::{load_binary, load_image};
use mipsim_core::soc::{Memory, MemoryAccess};
use pretty_assertions::assert_eq;

use crate::common::mocks::memory::MockMemory;

#[test]
fn binary_is_read_verbatim() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0x24, 0x01, 0x00, 0x05]).unwrap();

    let bytes = load_binary(file.path()).unwrap();
    assert_eq!(bytes, [0x24, 0x01, 0x00, 0x05]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_binary(dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn image_is_copied_without_byte_swapping() {
    let mut mem = Memory::new();
    load_image(&mut mem, 0x8002_0000, &[0x24, 0x01, 0x00, 0x05]).unwrap();
    assert_eq!(
        mem.read_u32(0x8002_0000, AccessOptions::REGULAR).unwrap(),
        0x2401_0005
    );
}

#[test]
fn loading_uses_internal_accesses() {
    let mut mem = MockMemory::new(0x100, 0);
    let log = mem.log();
    load_image(&mut mem, 0x10, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

    let log = log.borrow();
    assert_eq!((log.reads, log.writes), (0, 0));
    assert_eq!(log.internal, 1);
}

#[test]
fn image_past_the_address_space_is_rejected() {
    let mut mem = Memory::new();
    let err = load_image(&mut mem, 0xffff_fffe, &[0; 4]).unwrap_err();
    assert!(matches!(
        err,
        SimError::Memory(MemoryError::OutOfRange { addr: 0xffff_fffe, len: 4 })
    ));
}

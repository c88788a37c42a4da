//! Binary Loader.
//!
//! This module reads raw program images. An image is copied byte for byte, so it must
//! already be in the target's big-endian byte order; no header or relocation is
//! interpreted.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::{AccessOptions, Address, SimError};
use crate::soc::MemoryAccess;

/// Loads a binary file from disk into a byte vector.
///
/// # Errors
///
/// [`SimError::Io`] if the file cannot be read.
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>, SimError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "read image");
    Ok(bytes)
}

/// Copies `image` into `mem` at `addr` without touching any access statistics.
///
/// # Errors
///
/// [`SimError::Memory`] if part of the image lands outside every mapped range or past
/// the end of the address space.
pub fn load_image(mem: &mut dyn MemoryAccess, addr: Address, image: &[u8]) -> Result<(), SimError> {
    let _ = mem.write(addr, image, AccessOptions::INTERNAL)?;
    info!(
        addr = format_args!("{addr:#010x}"),
        bytes = image.len(),
        "loaded image"
    );
    Ok(())
}

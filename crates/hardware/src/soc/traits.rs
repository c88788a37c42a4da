//! Memory-access trait shared by memories, routers and caches.
//!
//! This module defines the `MemoryAccess` trait implemented by every component that can sit
//! on the program or data side of the core. It provides:
//! 1. **Byte Access:** `read` and `write` on arbitrary byte ranges.
//! 2. **Word Helpers:** Big-endian `u8`/`u16`/`u32` accessors built on the byte interface.
//! 3. **Access Control:** `read_ctl` / `write_ctl` dispatching on the decoded width and sign.
//! 4. **Introspection:** `location_status` and downcasting to the cache for statistics.

use std::cell::RefCell;
use std::ops::BitOr;
use std::rc::Rc;

use crate::common::{AccessOptions, Address, MemoryError};
use crate::core::pipeline::signals::AccessControl;
use crate::core::units::cache::Cache;

/// Introspection flags for one address, combined with `|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocationStatus(u8);

impl LocationStatus {
    /// Plain backing memory.
    pub const NONE: Self = Self(0);
    /// The address is held by a cache line.
    pub const CACHED: Self = Self(1 << 0);
    /// The cache line holding the address differs from backing memory.
    pub const DIRTY: Self = Self(1 << 1);
    /// The location cannot be written.
    pub const READ_ONLY: Self = Self(1 << 2);
    /// Nothing is mapped at the address.
    pub const ILLEGAL: Self = Self(1 << 3);

    /// Returns `true` if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for LocationStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Outcome of a successful write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Number of bytes accepted.
    pub n_bytes: usize,
    /// Whether any stored byte changed value.
    pub changed: bool,
}

/// Uniform byte-addressable memory interface.
///
/// Implemented by the sparse backing memory, the physical address router and the cache,
/// so any of them can be placed in front of the core.
pub trait MemoryAccess {
    /// Fills `dest` with the bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`MemoryError::Unmapped`] when no device answers, [`MemoryError::OutOfRange`] when the
    /// range leaves the address space.
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError>;

    /// Stores `src` starting at `addr`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MemoryAccess::read`].
    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError>;

    /// Pushes any buffered state (dirty cache lines) to the next level.
    ///
    /// # Errors
    ///
    /// Propagates failures of the next level.
    fn sync(&mut self) -> Result<(), MemoryError> {
        Ok(())
    }

    /// Reports how `addr` is currently held, without side effects.
    fn location_status(&self, addr: Address) -> LocationStatus;

    /// Returns the cache if this component is one.
    fn as_cache(&self) -> Option<&Cache> {
        None
    }

    /// Returns the cache mutably if this component is one.
    fn as_cache_mut(&mut self) -> Option<&mut Cache> {
        None
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::read`].
    fn read_u8(&mut self, addr: Address, opts: AccessOptions) -> Result<u8, MemoryError> {
        let mut buf = [0u8; 1];
        self.read(&mut buf, addr, opts)?;
        Ok(buf[0])
    }

    /// Reads a big-endian half-word.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::read`].
    fn read_u16(&mut self, addr: Address, opts: AccessOptions) -> Result<u16, MemoryError> {
        let mut buf = [0u8; 2];
        self.read(&mut buf, addr, opts)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::read`].
    fn read_u32(&mut self, addr: Address, opts: AccessOptions) -> Result<u32, MemoryError> {
        let mut buf = [0u8; 4];
        self.read(&mut buf, addr, opts)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::write`].
    fn write_u8(&mut self, addr: Address, val: u8, opts: AccessOptions) -> Result<(), MemoryError> {
        self.write(addr, &[val], opts).map(|_| ())
    }

    /// Writes a big-endian half-word.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::write`].
    fn write_u16(
        &mut self,
        addr: Address,
        val: u16,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        self.write(addr, &val.to_be_bytes(), opts).map(|_| ())
    }

    /// Writes a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::write`].
    fn write_u32(
        &mut self,
        addr: Address,
        val: u32,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        self.write(addr, &val.to_be_bytes(), opts).map(|_| ())
    }

    /// Performs a plain load selected by an access-control kind.
    ///
    /// Returns the value extended to 32 bits, or `None` if `ctl` is not a plain
    /// load width (composite kinds are handled by the memory stage).
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::read`].
    fn read_ctl(&mut self, ctl: AccessControl, addr: Address) -> Result<Option<u32>, MemoryError> {
        let opts = AccessOptions::REGULAR;
        let value = match ctl {
            AccessControl::Byte => i32::from(self.read_u8(addr, opts)? as i8) as u32,
            AccessControl::ByteUnsigned => u32::from(self.read_u8(addr, opts)?),
            AccessControl::Half => i32::from(self.read_u16(addr, opts)? as i16) as u32,
            AccessControl::HalfUnsigned => u32::from(self.read_u16(addr, opts)?),
            AccessControl::Word => self.read_u32(addr, opts)?,
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Performs a plain store selected by an access-control kind.
    ///
    /// Returns `false` if `ctl` is not a plain store width.
    ///
    /// # Errors
    ///
    /// See [`MemoryAccess::write`].
    fn write_ctl(&mut self, ctl: AccessControl, addr: Address, val: u32) -> Result<bool, MemoryError> {
        let opts = AccessOptions::REGULAR;
        match ctl {
            AccessControl::Byte | AccessControl::ByteUnsigned => {
                self.write_u8(addr, val as u8, opts)?;
            }
            AccessControl::Half | AccessControl::HalfUnsigned => {
                self.write_u16(addr, val as u16, opts)?;
            }
            AccessControl::Word => self.write_u32(addr, val, opts)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Backing memory shared between the program-side and data-side caches.
pub type SharedMemory<M> = Rc<RefCell<M>>;

impl<M: MemoryAccess + ?Sized> MemoryAccess for Rc<RefCell<M>> {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        self.borrow_mut().read(dest, addr, opts)
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        self.borrow_mut().write(addr, src, opts)
    }

    fn sync(&mut self) -> Result<(), MemoryError> {
        self.borrow_mut().sync()
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        self.borrow().location_status(addr)
    }
}

impl<M: MemoryAccess + ?Sized> MemoryAccess for Box<M> {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        (**self).read(dest, addr, opts)
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        (**self).write(addr, src, opts)
    }

    fn sync(&mut self) -> Result<(), MemoryError> {
        (**self).sync()
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        (**self).location_status(addr)
    }

    fn as_cache(&self) -> Option<&Cache> {
        (**self).as_cache()
    }

    fn as_cache_mut(&mut self) -> Option<&mut Cache> {
        (**self).as_cache_mut()
    }
}

//! Load/Store Unit (LSU).
//!
//! This module provides the Load/Store Unit used by the memory stage. It includes:
//! - [`atomic`]: The `LL`/`SC` reservation.
//! - [`unaligned`]: The `LWL`/`LWR`/`SWL`/`SWR` merge rules.
//!
//! Faults are split in two: architectural ones (misalignment, unmapped address) come
//! back as an [`ExceptionCause`] for the latch, host ones as a [`SimError`].

/// Load-linked / store-conditional reservation.
pub mod atomic;

/// Unaligned word access merge rules.
pub mod unaligned;

use self::atomic::Reservation;
use crate::common::{AccessOptions, ExceptionCause, MemoryError, SimError};
use crate::core::pipeline::signals::AccessControl;
use crate::soc::MemoryAccess;

/// Outcome of an LSU access: the inner `Err` is an architectural fault.
pub type LsuResult<T> = Result<Result<T, ExceptionCause>, SimError>;

fn classify<T>(res: Result<T, MemoryError>) -> LsuResult<T> {
    match res {
        Ok(v) => Ok(Ok(v)),
        Err(MemoryError::Unmapped { .. }) => Ok(Err(ExceptionCause::DBus)),
        Err(e) => Err(e.into()),
    }
}

/// Load/Store Unit (LSU) for memory operations.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Performs a load.
    ///
    /// # Arguments
    ///
    /// * `mem`  - Data memory
    /// * `ctl`  - Access-control kind
    /// * `addr` - Effective address
    /// * `reg`  - Current value of the target register (merged by `LWL`/`LWR`)
    /// * `res`  - Reservation updated by `LL`
    ///
    /// # Returns
    ///
    /// The value to write back to the target register.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedAccessControl`] for kinds that cannot load and
    /// [`SimError::Memory`] for accesses past the address space.
    pub fn load(
        mem: &mut dyn MemoryAccess,
        ctl: AccessControl,
        addr: u64,
        reg: u32,
        res: &mut Reservation,
    ) -> LsuResult<u32> {
        if addr % ctl.alignment() != 0 {
            return Ok(Err(ExceptionCause::AddrLoad));
        }
        let opts = AccessOptions::REGULAR;
        match ctl {
            AccessControl::WordLeft => {
                let word = classify(mem.read_u32(unaligned::word_base(addr), opts))?;
                Ok(word.map(|w| unaligned::load_left(w, reg, addr)))
            }
            AccessControl::WordRight => {
                let word = classify(mem.read_u32(unaligned::word_base(addr), opts))?;
                Ok(word.map(|w| unaligned::load_right(w, reg, addr)))
            }
            AccessControl::LoadLinked => {
                let word = classify(mem.read_u32(addr, opts))?;
                if word.is_ok() {
                    res.acquire(addr);
                }
                Ok(word)
            }
            _ => match classify(mem.read_ctl(ctl, addr))? {
                Ok(Some(v)) => Ok(Ok(v)),
                Ok(None) => Err(SimError::UnsupportedAccessControl(ctl.name())),
                Err(cause) => Ok(Err(cause)),
            },
        }
    }

    /// Performs a store.
    ///
    /// # Returns
    ///
    /// For `SC`, the success flag to write to the source register; `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnsupportedAccessControl`] for kinds that cannot store and
    /// [`SimError::Memory`] for accesses past the address space.
    pub fn store(
        mem: &mut dyn MemoryAccess,
        ctl: AccessControl,
        addr: u64,
        val: u32,
        res: &mut Reservation,
    ) -> LsuResult<Option<u32>> {
        if addr % ctl.alignment() != 0 {
            return Ok(Err(ExceptionCause::AddrStore));
        }
        let opts = AccessOptions::REGULAR;
        match ctl {
            AccessControl::WordLeft | AccessControl::WordRight => {
                let base = unaligned::word_base(addr);
                let word = match classify(mem.read_u32(base, opts))? {
                    Ok(w) => w,
                    Err(cause) => return Ok(Err(cause)),
                };
                let merged = if ctl == AccessControl::WordLeft {
                    unaligned::store_left(word, val, addr)
                } else {
                    unaligned::store_right(word, val, addr)
                };
                Ok(classify(mem.write_u32(base, merged, opts))?.map(|()| None))
            }
            AccessControl::StoreConditional => {
                if !res.try_commit(addr) {
                    return Ok(Ok(Some(0)));
                }
                Ok(classify(mem.write_u32(addr, val, opts))?.map(|()| Some(1)))
            }
            _ => match classify(mem.write_ctl(ctl, addr, val))? {
                Ok(true) => Ok(Ok(None)),
                Ok(false) => Err(SimError::UnsupportedAccessControl(ctl.name())),
                Err(cause) => Ok(Err(cause)),
            },
        }
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use mipsim_core::common::{AccessKind, AccessOptions, Address, MemoryError};
use mipsim_core::soc::{LocationStatus, MemoryAccess, WriteResult};

/// Access counters shared between a `MockMemory` and the test that built it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessLog {
    pub reads: usize,
    pub writes: usize,
    pub internal: usize,
    pub last_write: Option<(Address, usize)>,
}

/// Flat memory over `base..base + size`; everything else is unmapped.
#[derive(Debug)]
pub struct MockMemory {
    data: Vec<u8>,
    base: Address,
    log: Rc<RefCell<AccessLog>>,
}

impl MockMemory {
    pub fn new(size: usize, base: Address) -> Self {
        Self {
            data: vec![0; size],
            base,
            log: Rc::default(),
        }
    }

    /// Handle to the access counters, valid after the memory is boxed away.
    pub fn log(&self) -> Rc<RefCell<AccessLog>> {
        Rc::clone(&self.log)
    }

    fn range(&self, addr: Address, len: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        let end = addr + len as u64;
        if addr < self.base || end > self.base + self.data.len() as u64 {
            return Err(MemoryError::Unmapped { addr });
        }
        let start = (addr - self.base) as usize;
        Ok(start..start + len)
    }

    fn record(&self, opts: AccessOptions, write: Option<(Address, usize)>) {
        let mut log = self.log.borrow_mut();
        if opts.kind == AccessKind::Internal {
            log.internal += 1;
            return;
        }
        match write {
            Some(w) => {
                log.writes += 1;
                log.last_write = Some(w);
            }
            None => log.reads += 1,
        }
    }
}

impl MemoryAccess for MockMemory {
    fn read(
        &mut self,
        dest: &mut [u8],
        addr: Address,
        opts: AccessOptions,
    ) -> Result<(), MemoryError> {
        let range = self.range(addr, dest.len())?;
        dest.copy_from_slice(&self.data[range]);
        self.record(opts, None);
        Ok(())
    }

    fn write(
        &mut self,
        addr: Address,
        src: &[u8],
        opts: AccessOptions,
    ) -> Result<WriteResult, MemoryError> {
        let range = self.range(addr, src.len())?;
        let changed = self.data[range.clone()] != *src;
        self.data[range].copy_from_slice(src);
        self.record(opts, Some((addr, src.len())));
        Ok(WriteResult {
            n_bytes: src.len(),
            changed,
        })
    }

    fn location_status(&self, addr: Address) -> LocationStatus {
        if self.range(addr, 1).is_ok() {
            LocationStatus::NONE
        } else {
            LocationStatus::ILLEGAL
        }
    }
}

/// A `MockMemory` shared with the test so contents can be inspected behind a cache.
pub fn shared(size: usize, base: Address) -> Rc<RefCell<MockMemory>> {
    Rc::new(RefCell::new(MockMemory::new(size, base)))
}

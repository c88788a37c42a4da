//! Machine: memory, caches, coprocessor 0 and one core, assembled from a `Config`.
//!
//! The backing memory is a physical-address router with RAM mapped below the uncached
//! device window. It is shared by the program and data paths, each of which may put a
//! cache in front of it.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::common::constants::UNCACHED_START;
use crate::common::{AccessOptions, Address, ExceptionCause, RegisterFile, SimError};
use crate::config::{CacheConfig, Config, MemoryConfig};
use crate::core::arch::Cop0State;
use crate::core::units::cache::Cache;
use crate::core::{Core, PipelinedCore, Processor, SingleCycleCore};
use crate::sim::loader;
use crate::soc::{Memory, MemoryAccess, PhysAddrSpace, SharedMemory};
use crate::stats::SimStats;

/// Name of the RAM range in the physical address space.
pub const RAM_RANGE: &str = "ram";

/// Why [`Machine::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// An exception configured to stop was dispatched.
    Stopped {
        /// The cause that requested the stop.
        cause: Option<ExceptionCause>,
        /// PC after dispatch.
        pc: Address,
    },
    /// The cycle budget ran out.
    CycleLimit,
}

/// A complete simulated machine.
#[derive(Debug)]
pub struct Machine {
    config: Config,
    memory: SharedMemory<PhysAddrSpace>,
    cpu: Box<dyn Processor>,
    started: Instant,
}

fn attach_cache(
    memory: &SharedMemory<PhysAddrSpace>,
    config: &CacheConfig,
    timing: &MemoryConfig,
) -> Result<Box<dyn MemoryAccess>, SimError> {
    let backing: Box<dyn MemoryAccess> = Box::new(Rc::clone(memory));
    if !config.enabled {
        return Ok(backing);
    }
    Ok(Box::new(Cache::new(backing, config, timing)?))
}

impl Machine {
    /// Builds the machine described by `config`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidCacheConfig`] for unusable cache geometry.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;

        let mut space = PhysAddrSpace::new();
        space.insert_range(RAM_RANGE, 0, UNCACHED_START - 1, Box::new(Memory::new()))?;
        let memory = Rc::new(RefCell::new(space));

        let mem_program = attach_cache(&memory, &config.cache_program, &config.memory)?;
        let mem_data = attach_cache(&memory, &config.cache_data, &config.memory)?;

        let mut regs = RegisterFile::new();
        regs.set_pc(config.core.pc);
        let cop0 = config.core.cop0.then(Cop0State::new);
        let core = Core::new(regs, mem_program, mem_data, cop0);

        let cpu: Box<dyn Processor> = if config.core.pipelined {
            Box::new(PipelinedCore::new(core, config.core.hazard_unit))
        } else {
            Box::new(SingleCycleCore::new(core, config.core.delay_slot))
        };
        debug!(?cpu, "machine assembled");

        Ok(Self {
            config: config.clone(),
            memory,
            cpu,
            started: Instant::now(),
        })
    }

    /// Configuration the machine was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The selected core.
    pub fn processor(&self) -> &dyn Processor {
        self.cpu.as_ref()
    }

    /// The selected core, mutably.
    pub fn processor_mut(&mut self) -> &mut dyn Processor {
        self.cpu.as_mut()
    }

    /// Shared core state.
    pub fn core(&self) -> &Core {
        self.cpu.core()
    }

    /// Shared core state, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        self.cpu.core_mut()
    }

    /// Architectural registers.
    pub fn regs(&self) -> &RegisterFile {
        &self.cpu.core().regs
    }

    /// Backing memory shared by both paths, bypassing the caches.
    pub const fn memory(&self) -> &SharedMemory<PhysAddrSpace> {
        &self.memory
    }

    /// Copies a raw big-endian image into backing memory at `addr`.
    ///
    /// Load images before running: lines already cached are not refreshed.
    ///
    /// # Errors
    ///
    /// [`SimError::Memory`] if the image does not fit in RAM.
    pub fn load_image(&mut self, addr: Address, image: &[u8]) -> Result<(), SimError> {
        loader::load_image(&mut *self.memory.borrow_mut(), addr, image)
    }

    /// Reads an image file and loads it at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, otherwise as [`Machine::load_image`].
    pub fn load_file(&mut self, path: impl AsRef<Path>, addr: Address) -> Result<(), SimError> {
        let image = loader::load_binary(path)?;
        self.load_image(addr, &image)
    }

    /// Reads a data word as the core would see it, including dirty cache contents, without
    /// disturbing statistics.
    ///
    /// # Errors
    ///
    /// [`SimError::Memory`] if the address is unmapped.
    pub fn read_word(&mut self, addr: Address) -> Result<u32, SimError> {
        Ok(self.cpu.core_mut().mem_data.read_u32(addr, AccessOptions::INTERNAL)?)
    }

    /// Advances the machine by one cycle.
    ///
    /// # Errors
    ///
    /// Any host-level [`SimError`] raised by the core.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.cpu.step(false)
    }

    /// Steps until a stop is requested or `max_cycles` cycles have run.
    ///
    /// # Errors
    ///
    /// Any host-level [`SimError`] raised by the core; the machine stays at the failing cycle.
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, SimError> {
        self.cpu.core_mut().stop_requested = false;
        for _ in 0..max_cycles {
            self.cpu.step(false)?;
            let core = self.cpu.core();
            if core.stop_requested {
                let outcome = RunOutcome::Stopped {
                    cause: core.last_exception,
                    pc: core.regs.pc(),
                };
                info!(?outcome, cycle = core.cycle_count, "run stopped");
                return Ok(outcome);
            }
        }
        info!(cycles = max_cycles, "cycle budget exhausted");
        Ok(RunOutcome::CycleLimit)
    }

    /// Writes back every dirty cache line.
    ///
    /// # Errors
    ///
    /// [`SimError::Memory`] if a write-back fails.
    pub fn flush_caches(&mut self) -> Result<(), SimError> {
        self.cpu.core_mut().sync_memories()
    }

    /// Zeroes the cycle counters and empties the pipeline; memory and registers are kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.started = Instant::now();
    }

    /// Collects counters from the core and both caches.
    pub fn stats(&self) -> SimStats {
        SimStats::collect(self.cpu.core(), self.started.elapsed())
    }
}

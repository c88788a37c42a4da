//! Single-Cycle Core.
//!
//! This module implements the core variant that runs all five stages for one instruction
//! per cycle. It performs the following:
//! 1. **Stage Chaining:** Fetch, decode, execute, memory and writeback run in order and
//!    each latch feeds the next stage within the same cycle.
//! 2. **Delay Slot:** When enabled, the fetched instruction waits one cycle in a buffer, so
//!    the instruction after a jump or branch executes before the redirect takes effect.
//! 3. **Exception Dispatch:** A faulting instruction discards the buffered instruction and
//!    hands the exception to [`Core::dispatch_exception`].
//! 4. **Privileged Writes:** After `MTC0` the buffered instruction is fetched again so it
//!    observes the new coprocessor 0 state.

use std::mem;

use tracing::debug;

use super::Core;
use crate::common::SimError;
use crate::core::pipeline::latches::{IfId, Latch};
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, handle_pc, mem_stage, wb_stage,
};
use crate::core::pipeline::traits::{PipelineLatch, Processor};

/// Core that completes one instruction per cycle.
#[derive(Debug)]
pub struct SingleCycleCore {
    core: Core,
    delay_slot: bool,
    delay_buffer: IfId,
}

impl SingleCycleCore {
    /// Creates a single-cycle core, optionally with an architectural delay slot.
    pub fn new(core: Core, delay_slot: bool) -> Self {
        Self {
            core,
            delay_slot,
            delay_buffer: Latch::Empty,
        }
    }

    /// Returns `true` if the instruction after a jump or branch is executed.
    pub const fn has_delay_slot(&self) -> bool {
        self.delay_slot
    }

    /// The fetched instruction waiting for the next cycle (always empty without a delay slot).
    pub const fn delay_buffer(&self) -> &IfId {
        &self.delay_buffer
    }
}

impl Processor for SingleCycleCore {
    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn do_step(&mut self, skip_breakpoints: bool) -> Result<(), SimError> {
        let core = &mut self.core;

        let mut if_id = fetch_stage(core, skip_breakpoints)?;
        if self.delay_slot {
            mem::swap(&mut if_id, &mut self.delay_buffer);
        }

        let id_ex = decode_stage(core, &if_id, self.delay_slot);
        let ex_mem = execute_stage(core, &id_ex)?;
        let mem_wb = mem_stage(core, &ex_mem)?;
        wb_stage(core, &mem_wb);

        if let Some(m) = mem_wb.entry().filter(|m| m.meta.excause.is_some()) {
            self.delay_buffer.bubble();
            let (meta, mem_addr) = (m.meta, m.mem_addr);
            return core.dispatch_exception(&meta, mem_addr);
        }

        if let Some(epc) = ex_mem.entry().and_then(|e| e.redirect) {
            debug!(epc = format_args!("{epc:#010x}"), "exception return");
            core.regs.set_pc(epc);
            self.delay_buffer.bubble();
            return Ok(());
        }

        let stop_if = id_ex.entry().is_some_and(|d| d.stop_if());
        if stop_if {
            if let Some(addr) = self.delay_buffer.inst_addr() {
                core.regs.set_pc(addr);
                self.delay_buffer.bubble();
                return Ok(());
            }
        }

        let taken = handle_pc(&mut core.regs, &id_ex);
        if self.delay_slot {
            let likely = id_ex.entry().is_some_and(|d| d.is_likely());
            if taken {
                let branch_addr = id_ex.inst_addr();
                if let Some(f) = self.delay_buffer.entry_mut() {
                    f.meta.delay_slot_of = branch_addr;
                }
            } else if likely {
                self.delay_buffer.bubble();
            }
        }
        Ok(())
    }

    fn do_reset(&mut self) {
        self.delay_buffer.bubble();
    }
}

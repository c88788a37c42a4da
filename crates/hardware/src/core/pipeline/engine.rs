//! Five-stage pipelined core.
//!
//! Every cycle each stage consumes the latch the previous cycle left behind, so the
//! stages run in reverse order (writeback first, fetch last) and the new latches are
//! committed together. On top of the stage schedule this module implements:
//! 1. **Exception Squash:** An exception in MEM/WB squashes EX/MEM, ID/EX and IF/ID; one in
//!    EX/MEM squashes ID/EX and IF/ID; one in ID/EX squashes IF/ID. Fetch pauses until the
//!    oldest exception reaches MEM/WB and is dispatched.
//! 2. **Hazards:** [`resolve_hazards`] may forward into ID/EX or request a stall. A stall
//!    bubbles ID/EX and keeps IF/ID and the PC unchanged.
//! 3. **Fetch Pauses:** `MTC0` and `ERET` stop fetching until they leave the pipeline.
//! 4. **Delay Slots:** The instruction fetched in the cycle a branch resolves is its delay
//!    slot; a not-taken branch-likely nullifies it.

use tracing::debug;

use crate::common::SimError;
use crate::config::HazardUnit;
use crate::core::cpu::Core;
use crate::core::pipeline::hazards::resolve_hazards;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, Latch, MemWb};
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, handle_pc, mem_stage, wb_stage,
};
use crate::core::pipeline::traits::{PipelineLatch, Processor};

/// Pipelined core: five stages with four persistent latches.
///
/// The pipelined core always executes the instruction after a jump or branch.
#[derive(Debug)]
pub struct PipelinedCore {
    core: Core,
    hazard_unit: HazardUnit,
    if_id: IfId,
    id_ex: IdEx,
    ex_mem: ExMem,
    mem_wb: MemWb,
}

impl PipelinedCore {
    /// Creates a pipelined core with empty latches.
    pub fn new(core: Core, hazard_unit: HazardUnit) -> Self {
        Self {
            core,
            hazard_unit,
            if_id: Latch::Empty,
            id_ex: Latch::Empty,
            ex_mem: Latch::Empty,
            mem_wb: Latch::Empty,
        }
    }

    /// Configured hazard-unit mode.
    pub const fn hazard_unit(&self) -> HazardUnit {
        self.hazard_unit
    }

    /// IF/ID latch.
    pub const fn if_id(&self) -> &IfId {
        &self.if_id
    }

    /// ID/EX latch.
    pub const fn id_ex(&self) -> &IdEx {
        &self.id_ex
    }

    /// EX/MEM latch.
    pub const fn ex_mem(&self) -> &ExMem {
        &self.ex_mem
    }

    /// MEM/WB latch.
    pub const fn mem_wb(&self) -> &MemWb {
        &self.mem_wb
    }

    /// Returns `true` if no instruction is in flight.
    pub fn is_drained(&self) -> bool {
        self.if_id.is_empty()
            && self.id_ex.is_empty()
            && self.ex_mem.is_empty()
            && self.mem_wb.is_empty()
    }
}

impl Processor for PipelinedCore {
    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn do_step(&mut self, skip_breakpoints: bool) -> Result<(), SimError> {
        let core = &mut self.core;
        let saved_if_id = self.if_id;

        wb_stage(core, &self.mem_wb);
        let new_mem_wb = mem_stage(core, &self.ex_mem)?;
        // A fault in MEM squashes EX this cycle; skipping it keeps HI/LO and
        // coprocessor 0 free of side effects from the squashed instruction.
        let mut new_ex_mem = if new_mem_wb.has_exception() {
            Latch::Empty
        } else {
            execute_stage(core, &self.id_ex)?
        };
        let mut new_id_ex = decode_stage(core, &self.if_id, true);
        let mut new_if_id = self.if_id;

        let mut exception_in_progress = new_mem_wb.has_exception();
        if exception_in_progress {
            new_ex_mem.bubble();
        }
        exception_in_progress |= new_ex_mem.has_exception();
        if exception_in_progress {
            new_id_ex.bubble();
        }
        exception_in_progress |= new_id_ex.has_exception();
        if exception_in_progress {
            new_if_id.bubble();
        }

        let stall = resolve_hazards(self.hazard_unit, &mut new_id_ex, &new_ex_mem, &new_mem_wb);
        let fetch_paused = new_id_ex.entry().is_some_and(|d| d.stop_if())
            || new_ex_mem.entry().is_some_and(|e| e.stop_if)
            || new_mem_wb.entry().is_some_and(|m| m.stop_if);

        if let Some(epc) = new_ex_mem.entry().and_then(|e| e.redirect) {
            debug!(epc = format_args!("{epc:#010x}"), "exception return");
            core.regs.set_pc(epc);
        }

        self.mem_wb = new_mem_wb;
        self.ex_mem = new_ex_mem;
        self.id_ex = new_id_ex;
        self.if_id = new_if_id;

        if let Some(m) = self.mem_wb.entry().filter(|m| m.meta.excause.is_some()) {
            let (meta, mem_addr) = (m.meta, m.mem_addr);
            core.dispatch_exception(&meta, mem_addr)?;
        } else if exception_in_progress {
            // The PC cannot be derived from a squashed IF/ID; fetch resumes after dispatch.
        } else if stall {
            self.id_ex.bubble();
            self.if_id = saved_if_id;
            core.stall_count += 1;
        } else if fetch_paused {
            self.if_id.bubble();
        } else {
            self.if_id = fetch_stage(core, skip_breakpoints)?;
            let taken = handle_pc(&mut core.regs, &self.id_ex);
            let likely = self.id_ex.entry().is_some_and(|d| d.is_likely());
            if taken {
                let branch_addr = self.id_ex.inst_addr();
                if let Some(f) = self.if_id.entry_mut() {
                    f.meta.delay_slot_of = branch_addr;
                }
            } else if likely {
                self.if_id.bubble();
            }
        }
        Ok(())
    }

    fn do_reset(&mut self) {
        self.if_id.bubble();
        self.id_ex.bubble();
        self.ex_mem.bubble();
        self.mem_wb.bubble();
    }
}

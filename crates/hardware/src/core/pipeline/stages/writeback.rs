//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It commits the
//! result to the register file and counts the instruction as retired. An instruction
//! carrying an exception writes nothing and does not retire.

use tracing::trace;

use crate::core::cpu::Core;
use crate::core::observer::{CoreEvent, Stage};
use crate::core::pipeline::latches::MemWb;

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `core`   - Shared core state (register file, counters)
/// * `mem_wb` - The MEM/WB latch
pub fn wb_stage(core: &mut Core, mem_wb: &MemWb) {
    let Some(m) = mem_wb.entry() else {
        return;
    };
    if m.meta.excause.is_some() {
        return;
    }

    if m.reg_write {
        let value = u64::from(m.towrite_val);
        core.regs.write_gp(m.num_rd, value);
        trace!(
            addr = format_args!("{:#010x}", m.meta.inst_addr),
            reg = %m.num_rd,
            value = format_args!("{value:#010x}"),
            "WB"
        );
        if core.is_observed() && !m.num_rd.is_zero() {
            core.notify(&CoreEvent::RegisterWritten {
                reg: m.num_rd,
                value,
            });
        }
    }
    core.retired_count += 1;

    if core.is_observed() {
        core.notify(&CoreEvent::StageCompleted {
            stage: Stage::Writeback,
            inst_addr: Some(m.meta.inst_addr),
        });
    }
}

//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the instruction pipeline. It performs:
//! 1. **Loads and Stores:** Dispatches on the access-control kind through the LSU,
//!    including the unaligned and `LL`/`SC` forms.
//! 2. **Cache Maintenance:** `CACHE` writes back both memories.
//! 3. **Fault Tagging:** Misaligned and unmapped data accesses become `AddrLoad`,
//!    `AddrStore` or `DBus`; the faulting address is kept for `BadVAddr`.
//! 4. **Suppression:** An instruction carrying an exception touches no memory and
//!    schedules no register write.

use tracing::trace;

use crate::common::{ExceptionCause, SimError};
use crate::core::cpu::Core;
use crate::core::observer::{CoreEvent, Stage};
use crate::core::pipeline::latches::{ExMem, Latch, MemWb, MemoryEntry};
use crate::core::pipeline::signals::AccessControl;
use crate::core::units::lsu::Lsu;

/// Executes the memory access stage.
///
/// # Arguments
///
/// * `core`   - Shared core state (data memory, reservation)
/// * `ex_mem` - The EX/MEM latch
///
/// # Errors
///
/// Returns [`SimError::Memory`] for accesses past the address space and
/// [`SimError::UnsupportedAccessControl`] for an access kind the LSU cannot perform.
pub fn mem_stage(core: &mut Core, ex_mem: &ExMem) -> Result<MemWb, SimError> {
    let Some(e) = ex_mem.entry() else {
        return Ok(Latch::Empty);
    };
    let mut meta = e.meta;
    let mut entry = MemoryEntry {
        meta,
        towrite_val: e.alu_val,
        reg_write: e.reg_write,
        num_rd: e.num_rd,
        mem_addr: 0,
        stop_if: e.stop_if,
    };

    if let Some(cause) = meta.excause {
        entry.reg_write = false;
        if matches!(cause, ExceptionCause::AddrLoad | ExceptionCause::IBus) {
            // Fetch faults report the instruction address.
            entry.mem_addr = meta.inst_addr;
        }
    } else {
        let addr = u64::from(e.alu_val);
        let access = if e.mem_read {
            entry.mem_addr = addr;
            Lsu::load(
                core.mem_data.as_mut(),
                e.mem_ctl,
                addr,
                e.val_rt,
                &mut core.reservation,
            )?
            .map(Some)
        } else if e.mem_write {
            entry.mem_addr = addr;
            Lsu::store(
                core.mem_data.as_mut(),
                e.mem_ctl,
                addr,
                e.val_rt,
                &mut core.reservation,
            )?
        } else {
            if e.mem_ctl == AccessControl::CacheOp {
                core.sync_memories()?;
            }
            Ok(Some(e.alu_val))
        };

        match access {
            Ok(Some(value)) => entry.towrite_val = value,
            Ok(None) => {}
            Err(cause) => {
                meta.excause = Some(cause);
                entry.meta = meta;
                entry.reg_write = false;
            }
        }
    }

    trace!(
        addr = format_args!("{:#010x}", meta.inst_addr),
        mem_addr = format_args!("{:#010x}", entry.mem_addr),
        value = format_args!("{:#010x}", entry.towrite_val),
        excause = ?meta.excause,
        "MEM"
    );
    if core.is_observed() {
        core.notify(&CoreEvent::StageCompleted {
            stage: Stage::Memory,
            inst_addr: Some(meta.inst_addr),
        });
    }
    Ok(Latch::Instruction(entry))
}

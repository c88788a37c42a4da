//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for keeping the pipeline consistent when an
//! instruction in decode reads a register an older in-flight instruction has not yet
//! written back. It provides:
//! 1. **Hazard Detection:** Matches the decode-stage source registers against the
//!    destinations in the EX/MEM and MEM/WB latches. `$0` never creates a hazard.
//! 2. **Operand Forwarding:** In stall-and-forward mode, copies the producer's value into
//!    the ID/EX operand instead of stalling.
//! 3. **Stall Decisions:** Loads (and `SC`) in EX/MEM, and any producer of a branch or
//!    jump-register operand in EX/MEM, force a one-cycle stall.
//!
//! All three latches are the ones produced during the current cycle, so EX/MEM holds the
//! instruction immediately older than the one in ID/EX.

use tracing::debug;

use crate::common::RegisterId;
use crate::config::HazardUnit;
use crate::core::pipeline::latches::{ExMem, ExecuteEntry, IdEx, MemWb};
use crate::core::pipeline::signals::AccessControl;

/// Which consumer of an operand triggered the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Need {
    alu: bool,
    branch: bool,
}

impl Need {
    const fn any(self) -> bool {
        self.alu || self.branch
    }
}

/// Resolution of one source operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    /// The register file value is current.
    Clean,
    /// Replace the operand with this value.
    Forward(u32),
    /// The value is not yet available.
    Stall,
}

/// Returns `true` once the EX/MEM result is final (not pending a memory access).
const fn value_ready(e: &ExecuteEntry) -> bool {
    !e.mem_read && !matches!(e.mem_ctl, AccessControl::StoreConditional)
}

fn resolve_operand(
    mode: HazardUnit,
    reg: RegisterId,
    need: Need,
    ex_mem: &ExMem,
    mem_wb: &MemWb,
) -> Resolution {
    if reg.is_zero() || !need.any() {
        return Resolution::Clean;
    }

    if let Some(e) = ex_mem.entry().filter(|e| e.reg_write && e.num_rd == reg) {
        return match mode {
            HazardUnit::StallForward if !need.branch && value_ready(e) => {
                Resolution::Forward(e.alu_val)
            }
            _ => Resolution::Stall,
        };
    }

    if let Some(m) = mem_wb.entry().filter(|m| m.reg_write && m.num_rd == reg) {
        return match mode {
            HazardUnit::StallForward => Resolution::Forward(m.towrite_val),
            _ => Resolution::Stall,
        };
    }

    Resolution::Clean
}

/// Detects data hazards for the instruction in ID/EX and forwards values into it.
///
/// # Arguments
///
/// * `mode`   - Hazard-unit configuration
/// * `id_ex`  - The freshly decoded ID/EX latch; forwarded operands are written here
/// * `ex_mem` - The freshly executed EX/MEM latch
/// * `mem_wb` - The fresh MEM/WB latch
///
/// # Returns
///
/// `true` if the pipeline must stall for one cycle.
pub fn resolve_hazards(mode: HazardUnit, id_ex: &mut IdEx, ex_mem: &ExMem, mem_wb: &MemWb) -> bool {
    if mode == HazardUnit::None {
        return false;
    }
    let Some(d) = id_ex.entry_mut() else {
        return false;
    };
    if d.meta.excause.is_some() {
        return false;
    }

    let rs_need = Need {
        alu: d.alu_req_rs(),
        branch: d.branch_req_rs(),
    };
    let rt_need = Need {
        alu: d.alu_req_rt(),
        branch: d.branch_req_rt(),
    };

    let mut stall = false;
    match resolve_operand(mode, d.num_rs, rs_need, ex_mem, mem_wb) {
        Resolution::Clean => {}
        Resolution::Forward(v) => d.val_rs = v,
        Resolution::Stall => stall = true,
    }
    match resolve_operand(mode, d.num_rt, rt_need, ex_mem, mem_wb) {
        Resolution::Clean => {}
        Resolution::Forward(v) => d.val_rt = v,
        Resolution::Stall => stall = true,
    }

    if stall {
        debug!(addr = format_args!("{:#010x}", d.meta.inst_addr), "data hazard stall");
    }
    stall
}

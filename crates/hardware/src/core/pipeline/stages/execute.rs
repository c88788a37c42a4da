//! Instruction Execute (EX) Stage.
//!
//! This module implements the third stage of the instruction pipeline. It performs:
//! 1. **ALU Evaluation:** Runs the pure ALU on the (possibly forwarded) operands.
//! 2. **Privileged Operations:** `MFC0`, `MTC0`, `ERET` and `RDHWR` act directly on
//!    coprocessor 0 and the core counters.
//! 3. **Exception Tagging:** Overflow and trap conditions are attached to the latch; an
//!    instruction that already carries an exception is passed through untouched.

use tracing::trace;

use crate::common::{ExceptionCause, SimError};
use crate::core::arch::Cop0Register;
use crate::core::cpu::Core;
use crate::core::observer::{CoreEvent, Stage};
use crate::core::pipeline::latches::{DecodeEntry, ExMem, ExecuteEntry, IdEx, Latch};
use crate::core::pipeline::signals::SystemOp;
use crate::core::units::alu::{Alu, AluOutcome};
use crate::isa::instruction::InstructionBits;

/// `RDHWR` register numbers.
mod hwr {
    /// CPU number.
    pub const CPU_NUM: u32 = 0;
    /// Cycle counter.
    pub const CC: u32 = 2;
    /// Cycle counter resolution.
    pub const CC_RES: u32 = 3;
    /// Thread pointer (`UserLocal`).
    pub const ULR: u32 = 29;
}

fn system_op(core: &mut Core, d: &DecodeEntry) -> Result<(AluOutcome, Option<u64>), SimError> {
    let inst = d.meta.inst;
    let (rd, sel) = (inst.rd() as u8, inst.sel() as u8);
    let reserved = AluOutcome::exception(ExceptionCause::ReservedInstruction);

    let outcome = match d.sys() {
        SystemOp::None => AluOutcome::value(0),
        SystemOp::Mfc0 => match core.cop0.as_ref() {
            Some(cop0) => AluOutcome::value(cop0.read_rd_sel(rd, sel)?),
            None => reserved,
        },
        SystemOp::Mtc0 => match core.cop0.as_mut() {
            Some(cop0) => {
                cop0.write_rd_sel(rd, sel, d.val_rt)?;
                AluOutcome::value(0)
            }
            None => reserved,
        },
        SystemOp::Eret => match core.cop0.as_mut() {
            Some(cop0) => {
                cop0.set_status_exl(false);
                core.reservation.clear();
                let epc = u64::from(cop0.read(Cop0Register::EPC));
                return Ok((AluOutcome::value(0), Some(epc)));
            }
            None => reserved,
        },
        SystemOp::Rdhwr => match inst.rd() {
            hwr::CPU_NUM => AluOutcome::value(0),
            hwr::CC => AluOutcome::value(core.cycle_count as u32),
            hwr::CC_RES => AluOutcome::value(1),
            hwr::ULR => AluOutcome::value(
                core.cop0.as_ref().map_or(0, |c| c.read(Cop0Register::UserLocal)),
            ),
            _ => reserved,
        },
    };
    Ok((outcome, None))
}

/// Executes the instruction execute stage.
///
/// # Arguments
///
/// * `core`  - Shared core state (HI/LO, coprocessor 0, counters)
/// * `id_ex` - The ID/EX latch, after forwarding
///
/// # Errors
///
/// Returns [`SimError::UnsupportedCop0Register`] for `MFC0`/`MTC0` on an unmodeled register.
pub fn execute_stage(core: &mut Core, id_ex: &IdEx) -> Result<ExMem, SimError> {
    let Some(d) = id_ex.entry() else {
        return Ok(Latch::Empty);
    };
    let mut meta = d.meta;

    let mut entry = ExecuteEntry {
        meta,
        alu_val: 0,
        val_rt: d.val_rt,
        reg_write: false,
        num_rd: d.num_rd,
        mem_ctl: d.decoded.mem_ctl,
        mem_read: false,
        mem_write: false,
        stop_if: d.stop_if(),
        redirect: None,
    };

    if meta.excause.is_none() {
        let (outcome, redirect) = if d.sys() == SystemOp::None {
            let outcome = Alu::evaluate(d.decoded.alu, d.val_rs, d.alu_b(), d.shamt, &mut core.regs);
            (outcome, None)
        } else {
            system_op(core, d)?
        };
        meta.excause = outcome.excause;
        entry.meta = meta;
        entry.alu_val = outcome.value;
        entry.redirect = redirect;
        if meta.excause.is_none() {
            entry.reg_write = d.reg_write() && !outcome.discard;
            entry.mem_read = d.mem_read();
            entry.mem_write = d.mem_write();
        }
    }

    trace!(
        addr = format_args!("{:#010x}", meta.inst_addr),
        alu_val = format_args!("{:#010x}", entry.alu_val),
        excause = ?meta.excause,
        "EX"
    );
    if core.is_observed() {
        core.notify(&CoreEvent::StageCompleted {
            stage: Stage::Execute,
            inst_addr: Some(meta.inst_addr),
        });
    }
    Ok(Latch::Instruction(entry))
}

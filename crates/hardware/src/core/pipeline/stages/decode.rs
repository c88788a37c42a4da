//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the instruction pipeline. It performs:
//! 1. **Decoding:** Looks up the control bundle for the instruction word.
//! 2. **Operand Fetch:** Reads `rs` and `rt` from the register file.
//! 3. **Immediates and Targets:** Extends the immediate and computes jump/branch targets
//!    and the link value.
//! 4. **Exception Resolution:** An exception already pending from fetch wins over one the
//!    encoding itself raises.

use tracing::trace;

use crate::common::constants::RA_REG;
use crate::common::{ExceptionCause, RegisterId};
use crate::core::cpu::Core;
use crate::core::observer::{CoreEvent, Stage};
use crate::core::pipeline::latches::{DecodeEntry, IdEx, IfId, Latch};
use crate::core::pipeline::signals::{ControlFlow, RegDest};
use crate::isa::decode::decode;
use crate::isa::instruction::{InstructionBits, InstructionFlags};

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `core`       - Shared core state (register file, observers)
/// * `if_id`      - The IF/ID latch
/// * `delay_slot` - The core executes delay slots; the link value skips the slot
pub fn decode_stage(core: &mut Core, if_id: &IfId, delay_slot: bool) -> IdEx {
    let Some(fetched) = if_id.entry() else {
        return Latch::Empty;
    };
    let mut meta = fetched.meta;
    let inst = meta.inst;
    let decoded = decode(inst);

    if meta.excause.is_none() {
        meta.excause = if decoded.is_supported() {
            decoded.excause
        } else {
            Some(ExceptionCause::ReservedInstruction)
        };
    }

    let num_rs = RegisterId::from_field(inst.rs());
    let num_rt = RegisterId::from_field(inst.rt());
    let num_rd = match decoded.dest {
        RegDest::None => RegisterId::ZERO,
        RegDest::Rt => num_rt,
        RegDest::Rd => RegisterId::from_field(inst.rd()),
        RegDest::Ra => RegisterId::from_field(u32::from(RA_REG)),
    };

    let immediate = if decoded.flags.contains(InstructionFlags::ZERO_EXT_IMM) {
        inst.imm16()
    } else {
        inst.simm()
    };

    let next = meta.inst_addr.wrapping_add(4);
    let target = match decoded.flow {
        ControlFlow::Jump => (next & 0xf000_0000) | u64::from(inst.target26() << 2),
        ControlFlow::Branch { .. } => next.wrapping_add(u64::from(inst.simm() << 2)) & 0xffff_ffff,
        ControlFlow::None | ControlFlow::JumpRegister => 0,
    };
    let link_value = if delay_slot { next.wrapping_add(4) } else { next } as u32;

    let entry = DecodeEntry {
        meta,
        decoded,
        num_rs,
        num_rt,
        num_rd,
        val_rs: core.regs.read_gp(num_rs) as u32,
        val_rt: core.regs.read_gp(num_rt) as u32,
        immediate,
        shamt: inst.shamt() as u8,
        link_value,
        target,
    };

    trace!(
        addr = format_args!("{:#010x}", meta.inst_addr),
        alu = ?decoded.alu,
        flow = ?decoded.flow,
        rs = %num_rs,
        rt = %num_rt,
        rd = %num_rd,
        "ID"
    );
    if core.is_observed() {
        core.notify(&CoreEvent::StageCompleted {
            stage: Stage::Decode,
            inst_addr: Some(meta.inst_addr),
        });
    }
    Latch::Instruction(entry)
}

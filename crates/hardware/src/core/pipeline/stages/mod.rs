//! Pipeline stage implementations.
//!
//! This module contains the five stages shared by both core variants and the
//! program-counter resolution step. It includes:
//! 1. **Fetch:** Reads the instruction at the PC and tags breakpoints, interrupts and faults.
//! 2. **Decode:** Decodes the instruction, reads operands and computes branch targets.
//! 3. **Execute:** Evaluates the ALU and the privileged operations.
//! 4. **Memory:** Performs loads, stores and cache maintenance.
//! 5. **Writeback:** Commits results to the register file.
//!
//! Each stage reads its input latch and returns the next one; the core variant decides
//! when each latch is replaced.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;

use tracing::trace;

use crate::common::RegisterFile;
use crate::core::pipeline::latches::{DecodeEntry, IdEx};
use crate::core::pipeline::signals::{BranchCond, ControlFlow};

/// Evaluates a conditional branch on resolved operands.
fn branch_taken(d: &DecodeEntry, cond: BranchCond, negate: bool) -> bool {
    let rs = d.val_rs as i32;
    let result = match cond {
        BranchCond::Equal => d.val_rs == d.val_rt,
        BranchCond::LessThanZero => rs < 0,
        BranchCond::LessOrEqualZero => rs <= 0,
    };
    result != negate
}

/// Resolves the next fetch address from the instruction in the ID/EX latch.
///
/// Jumps and taken branches load their target into the PC; everything else, including a
/// bubble, advances the PC past the most recent fetch.
///
/// Returns `true` if control flow was redirected, which makes the following
/// instruction a delay-slot instruction.
pub fn handle_pc(regs: &mut RegisterFile, id_ex: &IdEx) -> bool {
    let Some(d) = id_ex.entry() else {
        regs.pc_inc();
        return false;
    };
    let target = match d.decoded.flow {
        ControlFlow::None => None,
        ControlFlow::Jump => Some(d.target),
        ControlFlow::JumpRegister => Some(u64::from(d.val_rs)),
        ControlFlow::Branch { cond, negate, .. } => {
            branch_taken(d, cond, negate).then_some(d.target)
        }
    };
    match target {
        Some(t) => {
            trace!(
                from = format_args!("{:#010x}", d.meta.inst_addr),
                to = format_args!("{t:#010x}"),
                "control transfer"
            );
            regs.set_pc(t);
            true
        }
        None => {
            regs.pc_inc();
            false
        }
    }
}

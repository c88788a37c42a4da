//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. It reads the word
//! at the current PC from program memory and tags it with the highest-priority condition
//! detected at fetch: a hardware breakpoint, then a pending interrupt, then a fetch fault.
//! The PC itself is advanced by [`super::handle_pc`], not here.

use tracing::trace;

use crate::common::{ExceptionCause, SimError};
use crate::core::cpu::Core;
use crate::core::observer::{CoreEvent, Stage};
use crate::core::pipeline::latches::{FetchEntry, IfId, InstMeta, Latch};

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `core`             - Shared core state
/// * `skip_breakpoints` - Ignore a hardware breakpoint at the current PC
///
/// # Errors
///
/// Returns [`SimError::Memory`] for fetches past the end of the address space.
pub fn fetch_stage(core: &mut Core, skip_breakpoints: bool) -> Result<IfId, SimError> {
    let pc = core.regs.pc();
    let (inst, fault) = match core.fetch_word(pc)? {
        Ok(word) => (word, None),
        Err(cause) => (0, Some(cause)),
    };

    // A breakpoint that was just reported lets its instruction through once, also when
    // the restart address is the branch that owns the delay slot.
    let resuming = core.reported_break == Some(pc);
    if resuming {
        core.reported_break = None;
    }

    let mut meta = InstMeta::new(inst, pc);
    meta.excause = if !skip_breakpoints && !resuming && core.is_hwbreak(pc) {
        Some(ExceptionCause::HwBreak)
    } else if core.cop0.as_ref().is_some_and(|c| c.core_interrupt_request()) {
        Some(ExceptionCause::Int)
    } else {
        fault
    };

    trace!(pc = format_args!("{pc:#010x}"), inst = format_args!("{inst:#010x}"), excause = ?meta.excause, "IF");
    if core.is_observed() {
        core.notify(&CoreEvent::StageCompleted {
            stage: Stage::Fetch,
            inst_addr: Some(pc),
        });
    }
    Ok(Latch::Instruction(FetchEntry { meta }))
}

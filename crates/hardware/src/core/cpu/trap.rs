//! Exception Handling Logic.
//!
//! This module implements exception dispatch, shared by both core variants. It performs
//! the following:
//! 1. **Restart Address:** Points the PC at the faulting instruction, or at its branch
//!    when the instruction sits in a delay slot.
//! 2. **Context Saving:** Updates `EPC`, `Cause` and `BadVAddr` when coprocessor 0 exists.
//! 3. **Vectoring:** Enters the exception vector and sets `Status.EXL` unless the cause is
//!    stepped over.
//! 4. **Handler Dispatch:** Calls the registered handler for the cause, or the default one.
//! 5. **Stop Policy:** Raises the external stop request for causes configured to stop.

use tracing::{debug, warn};

use super::Core;
use crate::common::{ExceptionCause, SimError};
use crate::core::arch::Cop0Register;
use crate::core::observer::CoreEvent;
use crate::core::pipeline::latches::InstMeta;

/// Everything a handler learns about an exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExceptionContext {
    /// Cause being dispatched.
    pub cause: ExceptionCause,
    /// Raw instruction word (zero for fetch faults).
    pub inst: u32,
    /// Address of the faulting instruction.
    pub inst_addr: u64,
    /// Address of the sequentially next instruction.
    pub next_addr: u64,
    /// Address of the jump or branch owning the delay slot, if any.
    pub jump_branch_pc: Option<u64>,
    /// The instruction executed in a delay slot.
    pub in_delay_slot: bool,
    /// Data address involved, for address and bus errors.
    pub mem_ref_addr: u64,
}

/// Services an architectural exception.
///
/// Handlers run after the core has recorded the exception and chosen the restart PC,
/// and may rewrite registers or memory (for example to emulate a system call).
pub trait ExceptionHandler {
    /// Attempts to service the exception.
    ///
    /// Returns `true` if the architectural state is fully handled.
    fn handle(&mut self, core: &mut Core, ctx: &ExceptionContext) -> bool;
}

/// Default handler: performs no emulation and leaves the stop policy to the core.
#[derive(Clone, Copy, Debug, Default)]
pub struct StopExceptionHandler;

impl ExceptionHandler for StopExceptionHandler {
    fn handle(&mut self, _core: &mut Core, ctx: &ExceptionContext) -> bool {
        debug!(
            cause = %ctx.cause,
            inst = format_args!("{:#010x}", ctx.inst),
            addr = format_args!("{:#010x}", ctx.inst_addr),
            "unhandled exception"
        );
        true
    }
}

impl Core {
    /// Dispatches the exception pending on `meta`.
    ///
    /// # Errors
    ///
    /// A reserved-instruction cause is a decoder gap, not modeled behavior, and is
    /// returned as [`SimError::UnsupportedInstruction`].
    pub(crate) fn dispatch_exception(
        &mut self,
        meta: &InstMeta,
        mem_ref_addr: u64,
    ) -> Result<(), SimError> {
        let Some(cause) = meta.excause else {
            return Ok(());
        };
        if cause == ExceptionCause::ReservedInstruction {
            return Err(SimError::UnsupportedInstruction {
                inst: meta.inst,
                addr: meta.inst_addr,
            });
        }

        let restart = meta.restart_addr();
        self.regs.set_pc(restart);
        if cause == ExceptionCause::HwBreak {
            self.reported_break = Some(meta.inst_addr);
        }

        let step_over = self.is_step_over_exception(cause);
        if let Some(cop0) = self.cop0.as_mut() {
            cop0.write_internal(Cop0Register::EPC, restart as u32);
            cop0.update_exception_cause(cause, meta.in_delay_slot());
            if matches!(cause, ExceptionCause::AddrLoad | ExceptionCause::AddrStore) {
                cop0.write_internal(Cop0Register::BadVAddr, mem_ref_addr as u32);
            }
            if !step_over && cop0.read(Cop0Register::EBase) != 0 {
                cop0.set_status_exl(true);
                self.regs.set_pc(cop0.exception_pc_address());
            }
        }

        let ctx = ExceptionContext {
            cause,
            inst: meta.inst,
            inst_addr: meta.inst_addr,
            next_addr: meta.inst_addr.wrapping_add(4),
            jump_branch_pc: meta.delay_slot_of,
            in_delay_slot: meta.in_delay_slot(),
            mem_ref_addr,
        };

        // The handler is taken out of its slot so it can borrow the core mutably.
        let slot = cause.index();
        let handled = if let Some(mut handler) = self.handlers[slot].take() {
            let handled = handler.handle(self, &ctx);
            if self.handlers[slot].is_none() {
                self.handlers[slot] = Some(handler);
            }
            handled
        } else if let Some(mut handler) = self.default_handler.take() {
            let handled = handler.handle(self, &ctx);
            if self.default_handler.is_none() {
                self.default_handler = Some(handler);
            }
            handled
        } else {
            false
        };
        if !handled {
            warn!(cause = %cause, addr = format_args!("{:#010x}", meta.inst_addr), "exception not handled");
        }

        self.reservation.clear();
        self.exception_count += 1;
        self.last_exception = Some(cause);
        debug!(
            cause = %cause,
            addr = format_args!("{:#010x}", meta.inst_addr),
            delay_slot = meta.in_delay_slot(),
            pc = format_args!("{:#010x}", self.regs.pc()),
            "exception dispatched"
        );
        let handler_pc = self.regs.pc();
        self.notify(&CoreEvent::ExceptionRaised {
            cause,
            inst_addr: meta.inst_addr,
            handler_pc,
        });

        if self.is_stop_on_exception(cause) {
            self.stop_requested = true;
            self.notify(&CoreEvent::StopRequested { cause });
        }
        Ok(())
    }
}

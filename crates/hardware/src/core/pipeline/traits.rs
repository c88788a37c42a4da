//! Processor and Latch Interfaces.
//!
//! This module defines the common traits shared by both core variants. It provides:
//! 1. **Processor Interface:** The cycle-stepping contract with the shared `step`/`reset`
//!    bookkeeping, leaving the stage schedule to each variant.
//! 2. **Pipeline Latch Interface:** Bubbling and status checks for inter-stage latches.

use std::fmt;

use crate::common::SimError;
use crate::core::cpu::Core;
use crate::core::observer::CoreEvent;

/// A cycle-stepped execution core.
///
/// Implementors provide the stage schedule in [`Processor::do_step`]; the provided
/// [`Processor::step`] adds the bookkeeping every variant shares.
pub trait Processor: fmt::Debug {
    /// Shared core state.
    fn core(&self) -> &Core;

    /// Mutable shared core state.
    fn core_mut(&mut self) -> &mut Core;

    /// Runs the stages for one cycle.
    ///
    /// # Errors
    ///
    /// Returns a host-level [`SimError`]; architectural exceptions are dispatched instead.
    fn do_step(&mut self, skip_breakpoints: bool) -> Result<(), SimError>;

    /// Returns every latch to the empty state.
    fn do_reset(&mut self);

    /// Advances the simulation by exactly one cycle.
    ///
    /// `skip_breakpoints` suppresses the hardware-breakpoint check for this cycle's fetch,
    /// which lets a caller resume from a breakpoint.
    ///
    /// # Errors
    ///
    /// Returns a host-level [`SimError`]. The cycle counter has already advanced.
    fn step(&mut self, skip_breakpoints: bool) -> Result<(), SimError> {
        let core = self.core_mut();
        core.cycle_count += 1;
        let cycles = core.cycle_count;
        if let Some(cop0) = core.cop0.as_mut() {
            cop0.update_count_and_compare_irq(cycles);
        }

        self.do_step(skip_breakpoints)?;

        let core = self.core_mut();
        let pc = core.regs.pc();
        core.notify(&CoreEvent::StepCompleted { cycle: cycles, pc });
        Ok(())
    }

    /// Zeroes the cycle and stall counters and empties every latch.
    ///
    /// Registers, memory and privileged state keep their contents.
    fn reset(&mut self) {
        let core = self.core_mut();
        core.cycle_count = 0;
        core.stall_count = 0;
        core.stop_requested = false;
        core.reservation.clear();
        core.reported_break = None;
        if let Some(cop0) = core.cop0.as_mut() {
            cop0.sync_core_cycles(0);
        }
        self.do_reset();
    }
}

/// Represents a pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Turns the latch into a bubble.
    fn bubble(&mut self);

    /// Checks if the latch holds no instruction.
    fn is_empty(&self) -> bool;

    /// Checks if the held instruction carries a pending exception.
    fn has_exception(&self) -> bool;
}

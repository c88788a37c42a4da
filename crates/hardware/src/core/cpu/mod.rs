//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Core` structure, the state shared by both core
//! variants. It coordinates the following:
//! 1. **State Management:** Owns the register file and the optional coprocessor 0 state.
//! 2. **Memory Hierarchy:** Holds the program-side and data-side memory-access objects.
//! 3. **Debug Control:** Hardware breakpoints and the per-cause stop/step-over policy.
//! 4. **Exception Handling:** The per-cause handler table and its default slot.
//! 5. **Bookkeeping:** Cycle, stall, retirement and exception counters, and observers.

/// Single-cycle core variant.
pub mod execution;

/// Program/data memory helpers.
pub mod memory;

/// Exception handlers and exception dispatch.
pub mod trap;

use std::collections::BTreeSet;
use std::fmt;

pub use self::execution::SingleCycleCore;
pub use self::trap::{ExceptionContext, ExceptionHandler, StopExceptionHandler};

use crate::common::{ExceptionCause, RegisterFile};
use crate::core::arch::Cop0State;
use crate::core::observer::{CoreEvent, CoreObserver};
use crate::core::units::lsu::atomic::Reservation;
use crate::soc::MemoryAccess;

/// Handler table: one optional slot per cause.
type HandlerTable = [Option<Box<dyn ExceptionHandler>>; ExceptionCause::COUNT];

/// State shared by every core variant.
///
/// The register file, coprocessor 0 and both memory-access objects are owned
/// exclusively by the core.
pub struct Core {
    /// Architectural registers.
    pub regs: RegisterFile,
    /// Coprocessor 0; `None` models a core without privileged state.
    pub cop0: Option<Cop0State>,
    /// Instruction-side memory (cache or backing memory).
    pub mem_program: Box<dyn MemoryAccess>,
    /// Data-side memory (cache or backing memory).
    pub mem_data: Box<dyn MemoryAccess>,

    /// Cycles since the last reset.
    pub cycle_count: u64,
    /// Stall cycles inserted by the hazard unit since the last reset.
    pub stall_count: u64,
    /// Instructions that completed writeback without an exception.
    pub retired_count: u64,
    /// Exceptions dispatched.
    pub exception_count: u64,
    /// An exception marked "stop" was dispatched; cleared by the driver.
    pub stop_requested: bool,
    /// Cause of the most recently dispatched exception.
    pub last_exception: Option<ExceptionCause>,
    /// `LL`/`SC` reservation.
    pub reservation: Reservation,
    /// Breakpoint address most recently reported; its next fetch does not break again.
    pub(crate) reported_break: Option<u64>,

    hw_breaks: BTreeSet<u64>,
    stop_on: [bool; ExceptionCause::COUNT],
    step_over: [bool; ExceptionCause::COUNT],
    handlers: HandlerTable,
    default_handler: Option<Box<dyn ExceptionHandler>>,
    observers: Vec<Box<dyn CoreObserver>>,
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("pc", &format_args!("{:#010x}", self.regs.pc()))
            .field("cop0", &self.cop0.is_some())
            .field("cycle_count", &self.cycle_count)
            .field("stall_count", &self.stall_count)
            .field("hw_breaks", &self.hw_breaks)
            .finish_non_exhaustive()
    }
}

impl Core {
    /// Creates a core around its register file, memories and optional privileged state.
    ///
    /// Every cause stops external stepping by default. Every cause except interrupts is
    /// stepped over (no jump to the exception vector) by default.
    pub fn new(
        regs: RegisterFile,
        mem_program: Box<dyn MemoryAccess>,
        mem_data: Box<dyn MemoryAccess>,
        cop0: Option<Cop0State>,
    ) -> Self {
        let mut step_over = [true; ExceptionCause::COUNT];
        step_over[ExceptionCause::Int.index()] = false;
        Self {
            regs,
            cop0,
            mem_program,
            mem_data,
            cycle_count: 0,
            stall_count: 0,
            retired_count: 0,
            exception_count: 0,
            stop_requested: false,
            last_exception: None,
            reservation: Reservation::default(),
            reported_break: None,
            hw_breaks: BTreeSet::new(),
            stop_on: [true; ExceptionCause::COUNT],
            step_over,
            handlers: std::array::from_fn(|_| None),
            default_handler: Some(Box::new(StopExceptionHandler)),
            observers: Vec::new(),
        }
    }

    /// Sets a hardware breakpoint on a fetch address.
    pub fn insert_hwbreak(&mut self, addr: u64) {
        let _ = self.hw_breaks.insert(addr);
    }

    /// Removes a hardware breakpoint. Unknown addresses are ignored.
    pub fn remove_hwbreak(&mut self, addr: u64) {
        let _ = self.hw_breaks.remove(&addr);
    }

    /// Returns `true` if a hardware breakpoint is set at `addr`.
    pub fn is_hwbreak(&self, addr: u64) -> bool {
        self.hw_breaks.contains(&addr)
    }

    /// Chooses whether dispatching `cause` requests an external stop.
    pub fn stop_on_exception(&mut self, cause: ExceptionCause, value: bool) {
        self.stop_on[cause.index()] = value;
    }

    /// Returns the stop policy for `cause`.
    pub const fn is_stop_on_exception(&self, cause: ExceptionCause) -> bool {
        self.stop_on[cause.index()]
    }

    /// Chooses whether dispatching `cause` continues without entering the exception vector.
    pub fn step_over_exception(&mut self, cause: ExceptionCause, value: bool) {
        self.step_over[cause.index()] = value;
    }

    /// Returns the step-over policy for `cause`.
    pub const fn is_step_over_exception(&self, cause: ExceptionCause) -> bool {
        self.step_over[cause.index()]
    }

    /// Registers a handler for `cause`, or the default handler when `cause` is `None`.
    ///
    /// Replaces any handler already in that slot.
    pub fn register_exception_handler(
        &mut self,
        cause: Option<ExceptionCause>,
        handler: Box<dyn ExceptionHandler>,
    ) {
        match cause {
            Some(c) => self.handlers[c.index()] = Some(handler),
            None => self.default_handler = Some(handler),
        }
    }

    /// Attaches an observer.
    pub fn add_observer(&mut self, observer: Box<dyn CoreObserver>) {
        self.observers.push(observer);
    }

    /// Detaches every observer.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Publishes an event to every observer.
    pub(crate) fn notify(&mut self, event: &CoreEvent) {
        for obs in &mut self.observers {
            obs.on_event(event);
        }
    }

    /// Returns `true` if anything is listening; lets stages skip building events.
    #[inline]
    pub(crate) fn is_observed(&self) -> bool {
        !self.observers.is_empty()
    }
}

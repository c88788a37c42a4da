//! Core Event Observation.
//!
//! Visualizers, tracers and statistics collectors attach to a core through the
//! [`CoreObserver`] trait. The core publishes a [`CoreEvent`] after each completed stage,
//! register write, exception and step. A core with no observers attached simulates
//! identically.
//!
//! Any `std::sync::mpsc::Sender<CoreEvent>` is an observer, so events can be consumed
//! from a channel on another thread between `step()` calls.

use std::fmt;
use std::sync::mpsc::Sender;

use crate::common::{ExceptionCause, RegisterId};

/// Pipeline stage names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Instruction fetch.
    Fetch,
    /// Instruction decode and register read.
    Decode,
    /// ALU and privileged operations.
    Execute,
    /// Data memory access.
    Memory,
    /// Register writeback.
    Writeback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        };
        f.write_str(name)
    }
}

/// Notification published by a core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreEvent {
    /// A stage produced its output latch for this cycle.
    StageCompleted {
        /// Stage that ran.
        stage: Stage,
        /// Address of the instruction it produced, or `None` for a bubble.
        inst_addr: Option<u64>,
    },
    /// A general-purpose register was written by writeback.
    RegisterWritten {
        /// Destination register.
        reg: RegisterId,
        /// Value written.
        value: u64,
    },
    /// An exception was dispatched.
    ExceptionRaised {
        /// Cause.
        cause: ExceptionCause,
        /// Address of the faulting instruction.
        inst_addr: u64,
        /// PC after dispatch.
        handler_pc: u64,
    },
    /// An exception configured to stop external stepping was dispatched.
    StopRequested {
        /// Cause.
        cause: ExceptionCause,
    },
    /// A `step()` call finished.
    StepCompleted {
        /// Cycle counter after the step.
        cycle: u64,
        /// Program counter after the step.
        pc: u64,
    },
}

/// Receiver of core events.
pub trait CoreObserver {
    /// Called synchronously by the core for every event.
    fn on_event(&mut self, event: &CoreEvent);
}

impl CoreObserver for Sender<CoreEvent> {
    fn on_event(&mut self, event: &CoreEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.send(*event);
    }
}

//! Core processor implementation.
//!
//! This module contains the two MIPS32 core variants and everything they share:
//! coprocessor 0, the pipeline stages and latches, the execution units and the
//! observer interface.

/// Architecture-specific state (coprocessor 0).
pub mod arch;

/// Shared core state, exception dispatch and the single-cycle core.
pub mod cpu;

/// Observer events published by the cores.
pub mod observer;

/// Instruction pipeline implementation (stages, latches, hazards, signals, pipelined core).
pub mod pipeline;

/// Execution units (ALU, LSU, cache).
pub mod units;

pub use self::cpu::{Core, SingleCycleCore};
pub use self::observer::{CoreEvent, CoreObserver, Stage};
pub use self::pipeline::PipelinedCore;
pub use self::pipeline::traits::Processor;

//! Instruction pipeline implementation.
//!
//! This module contains the five-stage instruction pipeline shared by both core variants.
//! It includes the following components:
//! 1. **Engine:** The pipelined core and its per-cycle schedule.
//! 2. **Hazards:** Detection of data hazards, forwarding and stall decisions.
//! 3. **Latches:** Inter-stage buffers for communication between pipeline stages.
//! 4. **Signals:** Control signals generated during instruction decoding.
//! 5. **Stages:** Implementation of Fetch, Decode, Execute, Memory, and Writeback stages.
//! 6. **Traits:** The processor interface and the latch interface.

/// Pipelined core.
pub mod engine;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Processor and latch traits.
pub mod traits;

pub use self::engine::PipelinedCore;

//! Instructional MIPS32 simulator library.
//!
//! This crate implements a cycle-stepped MIPS32 (big-endian) simulator with the following:
//! 1. **Core:** A single-cycle core with an optional delay slot and a five-stage pipelined
//!    core with a configurable hazard unit, sharing one set of stage functions.
//! 2. **Privileged State:** Coprocessor 0 with `Count`/`Compare`, exception vectoring,
//!    hardware breakpoints and a pluggable exception-handler table.
//! 3. **Memory:** Sparse RAM behind a physical-address router, fronted by optional
//!    set-associative program and data caches.
//! 4. **ISA:** Match-based decoding of a MIPS32 integer subset.
//! 5. **Simulation:** Machine assembly from JSON configuration, image loading and statistics.
//!
//! # Examples
//!
//! ```
//! use mipsim_core::{Config, Machine, RunOutcome};
//!
//! let mut machine = Machine::new(&Config::default()).unwrap();
//! let pc = machine.regs().pc();
//! // addiu $2, $0, 7 ; break
//! machine.load_image(pc, &[0x24, 0x02, 0x00, 0x07, 0x00, 0x00, 0x00, 0x0d]).unwrap();
//! let outcome = machine.run(100).unwrap();
//! assert!(matches!(outcome, RunOutcome::Stopped { .. }));
//! assert_eq!(machine.regs().read_gp_index(2).unwrap(), 7);
//! ```

/// Common types and constants (addresses, registers, exception causes, access options).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU cores (pipeline, coprocessor 0, execution units, exception dispatch).
pub mod core;
/// Instruction set (opcode table, decoded control bundle).
pub mod isa;
/// Machine assembly, run loop and image loading.
pub mod sim;
/// Memory side (memory-access trait, RAM, address router).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or parse JSON with `Config::from_json`.
pub use crate::config::Config;
/// Processor interface implemented by both core variants.
pub use crate::core::Processor;
/// Complete machine; construct with `Machine::new`.
pub use crate::sim::{Machine, RunOutcome};

//! Execution units and functional components.
//!
//! This module contains the integer ALU, the load/store unit and the
//! set-associative cache placed in front of program and data memory.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Cache implementation with replacement and write policies.
pub mod cache;

/// Load/Store Unit for memory access operations.
pub mod lsu;

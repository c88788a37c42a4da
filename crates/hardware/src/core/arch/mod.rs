//! MIPS32 architecture-specific components.
//!
//! This module contains the privileged architectural state that sits beside the register
//! file: coprocessor 0 register definitions, the `(rd, sel)` register map, exception
//! recording and the interrupt lines.

/// Coprocessor 0 registers, exception recording and interrupt lines.
pub mod cop0;

pub use cop0::{Cop0Register, Cop0State};

//! Mock collaborators.

/// Exception-handler mocks.
pub mod handler;

/// Instrumented flat memory.
pub mod memory;

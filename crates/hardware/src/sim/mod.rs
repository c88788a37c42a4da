//! Simulation driver and program loading.
//!
//! Provides the [`Machine`] that assembles memory, caches, coprocessor 0 and a core from
//! a [`Config`](crate::config::Config), and helpers for loading raw program images.

/// Raw image loading.
pub mod loader;

/// Machine assembly and the run loop.
pub mod simulator;

pub use self::simulator::{Machine, RunOutcome};

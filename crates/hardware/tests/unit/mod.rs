//! Unit tests, laid out like the library's `src` tree.

pub mod config;
pub mod equivalence;
pub mod soc;
pub mod stats;

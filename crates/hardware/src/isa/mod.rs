//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the MIPS32 opcode tables, instruction field extraction and the decoder
//! consumed by the decode stage.
//!
//! # Coverage
//!
//! * Integer ALU, shifts, rotates, set-less-than and `LUI`.
//! * Multiply/divide with HI/LO, `MUL`, `MADD`/`MSUB`, `CLZ`/`CLO`.
//! * `MOVZ`/`MOVN`, `SEB`/`SEH`/`WSBH`.
//! * Branches (including branch-likely and linking forms) and jumps.
//! * Loads and stores, `LWL`/`LWR`/`SWL`/`SWR`, `LL`/`SC`, `CACHE`.
//! * `SYSCALL`, `BREAK`, conditional traps, `MFC0`/`MTC0`/`ERET`, `RDHWR`, `SYNC`.

/// Instruction decoding into control bundles.
pub mod decode;

/// Instruction field extraction, flags and the decoded bundle.
pub mod instruction;

/// Opcode and function-code constants.
pub mod opcodes;

//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the five stages:
//! Fetch → Decode → Execute → Memory → Writeback.
//!
//! 1. **Bubbles:** Every latch is a [`Latch`], either `Empty` or holding one instruction, so
//!    squashing a stage is a single assignment.
//! 2. **Instruction Identity:** [`InstMeta`] travels unchanged through every stage and
//!    carries the raw word, its address, the delay-slot origin and any pending exception.
//! 3. **Forwarding Sources:** The Execute and Memory entries expose the values the hazard
//!    unit forwards.

use crate::common::{ExceptionCause, RegisterId};
use crate::core::pipeline::signals::{AccessControl, BranchCond, ControlFlow, SystemOp};
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::instruction::{Decoded, InstructionFlags};

/// Identity of an in-flight instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstMeta {
    /// Raw instruction word (zero for fetch faults).
    pub inst: u32,
    /// Address the instruction was fetched from.
    pub inst_addr: u64,
    /// Pending architectural exception.
    pub excause: Option<ExceptionCause>,
    /// Address of the jump or branch whose delay slot holds this instruction.
    pub delay_slot_of: Option<u64>,
}

impl InstMeta {
    /// Creates the identity of a freshly fetched instruction.
    pub const fn new(inst: u32, inst_addr: u64) -> Self {
        Self {
            inst,
            inst_addr,
            excause: None,
            delay_slot_of: None,
        }
    }

    /// Returns `true` if the instruction executes in a delay slot.
    #[inline]
    pub const fn in_delay_slot(&self) -> bool {
        self.delay_slot_of.is_some()
    }

    /// Address execution restarts at after an exception on this instruction.
    ///
    /// A delay-slot instruction restarts at its branch so the branch is re-evaluated.
    #[inline]
    pub fn restart_addr(&self) -> u64 {
        self.delay_slot_of.unwrap_or(self.inst_addr)
    }
}

/// Access to the identity carried by every latch entry.
pub trait LatchEntry {
    /// Instruction identity.
    fn meta(&self) -> &InstMeta;

    /// Mutable instruction identity.
    fn meta_mut(&mut self) -> &mut InstMeta;
}

/// An inter-stage latch: a bubble or one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Latch<T> {
    /// Bubble (no-op).
    #[default]
    Empty,
    /// An instruction in flight.
    Instruction(T),
}

impl<T> Latch<T> {
    /// The entry, if the latch is not a bubble.
    #[inline]
    pub const fn entry(&self) -> Option<&T> {
        match self {
            Self::Empty => None,
            Self::Instruction(e) => Some(e),
        }
    }

    /// Mutable entry, if the latch is not a bubble.
    #[inline]
    pub const fn entry_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Empty => None,
            Self::Instruction(e) => Some(e),
        }
    }
}

impl<T: LatchEntry> Latch<T> {
    /// Identity of the held instruction.
    #[inline]
    pub fn meta(&self) -> Option<&InstMeta> {
        self.entry().map(LatchEntry::meta)
    }

    /// Pending exception of the held instruction.
    #[inline]
    pub fn excause(&self) -> Option<ExceptionCause> {
        self.meta().and_then(|m| m.excause)
    }

    /// Address of the held instruction.
    #[inline]
    pub fn inst_addr(&self) -> Option<u64> {
        self.meta().map(|m| m.inst_addr)
    }
}

impl<T: LatchEntry> PipelineLatch for Latch<T> {
    fn bubble(&mut self) {
        *self = Self::Empty;
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn has_exception(&self) -> bool {
        self.excause().is_some()
    }
}

/// Entry in the IF/ID latch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchEntry {
    /// Instruction identity.
    pub meta: InstMeta,
}

/// Entry in the ID/EX latch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Instruction identity.
    pub meta: InstMeta,
    /// Control bundle from the decoder.
    pub decoded: Decoded,
    /// `rs` register number.
    pub num_rs: RegisterId,
    /// `rt` register number.
    pub num_rt: RegisterId,
    /// Destination register; `$0` when nothing is written.
    pub num_rd: RegisterId,
    /// Value of `rs`, possibly replaced by forwarding.
    pub val_rs: u32,
    /// Value of `rt`, possibly replaced by forwarding.
    pub val_rt: u32,
    /// Sign- or zero-extended immediate.
    pub immediate: u32,
    /// Shift amount field.
    pub shamt: u8,
    /// Return address written by the linking jumps and branches.
    pub link_value: u32,
    /// Target of `J`/`JAL` and of the conditional branches.
    pub target: u64,
}

impl DecodeEntry {
    #[inline]
    const fn has(&self, flag: InstructionFlags) -> bool {
        self.decoded.flags.contains(flag)
    }

    /// The instruction writes `num_rd`.
    #[inline]
    pub const fn reg_write(&self) -> bool {
        self.has(InstructionFlags::REG_WRITE) && self.meta.excause.is_none()
    }

    /// The instruction loads from data memory.
    #[inline]
    pub const fn mem_read(&self) -> bool {
        self.has(InstructionFlags::MEM_READ)
    }

    /// The instruction stores to data memory.
    #[inline]
    pub const fn mem_write(&self) -> bool {
        self.has(InstructionFlags::MEM_WRITE)
    }

    /// Fetching must pause until this instruction leaves the pipeline.
    #[inline]
    pub const fn stop_if(&self) -> bool {
        self.has(InstructionFlags::STOP_IF)
    }

    /// Execution consumes `rs`.
    #[inline]
    pub const fn alu_req_rs(&self) -> bool {
        self.has(InstructionFlags::ALU_REQ_RS)
    }

    /// Execution or memory consumes `rt`.
    #[inline]
    pub const fn alu_req_rt(&self) -> bool {
        self.has(InstructionFlags::ALU_REQ_RT)
    }

    /// The branch decision or jump target reads `rs`.
    pub const fn branch_req_rs(&self) -> bool {
        matches!(
            self.decoded.flow,
            ControlFlow::JumpRegister | ControlFlow::Branch { .. }
        )
    }

    /// The branch decision reads `rt`.
    pub const fn branch_req_rt(&self) -> bool {
        matches!(
            self.decoded.flow,
            ControlFlow::Branch {
                cond: BranchCond::Equal,
                ..
            }
        )
    }

    /// Branch-likely form: the delay slot is nullified when not taken.
    pub const fn is_likely(&self) -> bool {
        matches!(self.decoded.flow, ControlFlow::Branch { likely: true, .. })
    }

    /// ALU operand `b`: link value, immediate or `rt`.
    pub const fn alu_b(&self) -> u32 {
        if self.has(InstructionFlags::LINK) {
            self.link_value
        } else if self.has(InstructionFlags::ALU_SRC_IMM) {
            self.immediate
        } else {
            self.val_rt
        }
    }

    /// Privileged or non-pure operation.
    #[inline]
    pub const fn sys(&self) -> SystemOp {
        self.decoded.sys
    }
}

/// Entry in the EX/MEM latch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteEntry {
    /// Instruction identity.
    pub meta: InstMeta,
    /// ALU result; the effective address for memory instructions.
    pub alu_val: u32,
    /// Store data and `LWL`/`LWR` merge source.
    pub val_rt: u32,
    /// A register write is scheduled.
    pub reg_write: bool,
    /// Destination register.
    pub num_rd: RegisterId,
    /// Memory access kind.
    pub mem_ctl: AccessControl,
    /// Loads from data memory.
    pub mem_read: bool,
    /// Stores to data memory.
    pub mem_write: bool,
    /// Fetching is paused until this instruction leaves the pipeline.
    pub stop_if: bool,
    /// New PC requested by `ERET`.
    pub redirect: Option<u64>,
}

/// Entry in the MEM/WB latch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryEntry {
    /// Instruction identity.
    pub meta: InstMeta,
    /// Value for the destination register.
    pub towrite_val: u32,
    /// A register write is scheduled.
    pub reg_write: bool,
    /// Destination register.
    pub num_rd: RegisterId,
    /// Data address touched, recorded as `BadVAddr` on address errors.
    pub mem_addr: u64,
    /// Fetching is paused until this instruction leaves the pipeline.
    pub stop_if: bool,
}

macro_rules! impl_latch_entry {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LatchEntry for $ty {
                #[inline]
                fn meta(&self) -> &InstMeta {
                    &self.meta
                }

                #[inline]
                fn meta_mut(&mut self) -> &mut InstMeta {
                    &mut self.meta
                }
            }
        )*
    };
}

impl_latch_entry!(FetchEntry, DecodeEntry, ExecuteEntry, MemoryEntry);

/// IF/ID latch.
pub type IfId = Latch<FetchEntry>;
/// ID/EX latch.
pub type IdEx = Latch<DecodeEntry>;
/// EX/MEM latch.
pub type ExMem = Latch<ExecuteEntry>;
/// MEM/WB latch.
pub type MemWb = Latch<MemoryEntry>;

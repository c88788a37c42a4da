//! Core Equivalence Tests.
//!
//! Every core variant with hazard protection must reach the same architectural state for
//! the same program. Only cycle counts may differ.

use mipsim_core::common::ExceptionCause;
use mipsim_core::config::HazardUnit;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::builder::instruction::asm;
use crate::common::harness::{DATA_BASE, TestContext};

const DATA: i16 = DATA_BASE as i16;

fn variants() -> Vec<(&'static str, TestContext)> {
    vec![
        ("single-cycle", TestContext::single_cycle()),
        ("single-cycle without delay slot", TestContext::single_cycle_no_delay_slot()),
        ("pipelined, stall", TestContext::pipelined(HazardUnit::Stall)),
        ("pipelined, forward", TestContext::pipelined(HazardUnit::StallForward)),
    ]
}

/// Sums 10..=1 in a loop, then exercises memory, multiply and shifts.
///
/// Delay slots hold `nop` so the result does not depend on whether they execute.
fn sum_program() -> Vec<u32> {
    vec![
        asm::addiu(1, 0, 10),
        asm::addu(2, 0, 0),
        asm::addu(2, 2, 1),
        asm::addiu(1, 1, -1),
        asm::bne(1, 0, -3),
        asm::nop(),
        asm::sw(2, DATA, 0),
        asm::lw(3, DATA, 0),
        asm::mult(3, 3),
        asm::mflo(4),
        asm::sll(5, 4, 2),
        asm::addiu(6, 0, 0x44),
        asm::sb(6, DATA + 4, 0),
        asm::brk(),
    ]
}

#[test]
fn loop_program_agrees_across_cores() {
    let mut reference = None;
    for (name, ctx) in variants() {
        let mut ctx = ctx.load_program(&sum_program());
        assert_eq!(ctx.run_to_stop(), ExceptionCause::Break, "{name}");

        assert_eq!(ctx.reg(2), 55, "{name}");
        assert_eq!(ctx.reg(3), 55, "{name}");
        assert_eq!(ctx.reg(4), 3025, "{name}");
        assert_eq!(ctx.reg(5), 12_100, "{name}");
        assert_eq!(ctx.word(DATA_BASE), 55, "{name}");
        assert_eq!(ctx.word(DATA_BASE + 4), 0x4400_0000, "{name}");

        match &reference {
            None => reference = Some(ctx.regs().clone()),
            Some(regs) => assert!(regs.same_state_ignoring_pc(ctx.regs()), "{name}"),
        }
    }
}

#[test]
fn pipelining_costs_cycles_not_results() {
    let mut single = TestContext::single_cycle().load_program(&sum_program());
    let mut stall = TestContext::pipelined(HazardUnit::Stall).load_program(&sum_program());
    let mut forward = TestContext::pipelined(HazardUnit::StallForward).load_program(&sum_program());
    let _ = single.run_to_stop();
    let _ = stall.run_to_stop();
    let _ = forward.run_to_stop();

    assert_eq!(single.core().retired_count, forward.core().retired_count);
    assert!(stall.core().stall_count > forward.core().stall_count);
    assert!(stall.core().cycle_count > forward.core().cycle_count);
    assert!(forward.core().cycle_count > single.core().cycle_count);
}

fn alu_instruction() -> impl Strategy<Value = u32> {
    (0..8u8, 1..8u32, 0..8u32, 0..8u32, any::<i16>()).prop_map(|(op, rd, rs, rt, imm)| match op {
        0 => asm::addu(rd, rs, rt),
        1 => asm::subu(rd, rs, rt),
        2 => asm::xor(rd, rs, rt),
        3 => asm::or(rd, rs, rt),
        4 => asm::slt(rd, rs, rt),
        5 => asm::addiu(rd, rs, imm),
        6 => asm::ori(rd, rs, imm as u16),
        _ => asm::sll(rd, rt, (imm as u32) & 31),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn straight_line_alu_programs_agree(
        seeds in prop::array::uniform7(any::<u32>()),
        body in prop::collection::vec(alu_instruction(), 1..24),
    ) {
        let mut program = body;
        program.push(asm::brk());

        let mut states = Vec::new();
        for (name, ctx) in variants() {
            let mut ctx = ctx.load_program(&program);
            for (idx, seed) in seeds.iter().enumerate() {
                ctx.set_reg(idx + 1, *seed);
            }
            prop_assert_eq!(ctx.run_to_stop(), ExceptionCause::Break, "{}", name);
            states.push((name, ctx.regs().clone()));
        }

        let (_, first) = &states[0];
        for (name, regs) in &states[1..] {
            prop_assert!(first.same_state_ignoring_pc(regs), "{} diverged", name);
        }
    }
}

//! Hardware Breakpoint Tests.

use mipsim_core::common::ExceptionCause;
use mipsim_core::config::HazardUnit;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::asm;
use crate::common::harness::{PROGRAM_BASE, TestContext};

fn at(index: u64) -> u64 {
    PROGRAM_BASE + 4 * index
}

fn program() -> Vec<u32> {
    vec![
        asm::addiu(1, 0, 1),
        asm::addiu(2, 0, 2),
        asm::addiu(3, 0, 3),
        asm::addiu(4, 0, 4),
        asm::brk(),
    ]
}

#[rstest]
#[case::single_cycle(TestContext::single_cycle())]
#[case::no_delay_slot(TestContext::single_cycle_no_delay_slot())]
#[case::pipelined(TestContext::pipelined(HazardUnit::StallForward))]
fn breakpoint_stops_before_the_instruction_and_resumes(#[case] ctx: TestContext) {
    let mut ctx = ctx.load_program(&program());
    ctx.core_mut().insert_hwbreak(at(2));
    assert!(ctx.core().is_hwbreak(at(2)));

    assert_eq!(ctx.run_to_stop(), ExceptionCause::HwBreak);
    assert_eq!(ctx.pc(), at(2));
    assert_eq!((ctx.reg(1), ctx.reg(2)), (1, 2), "older instructions completed");
    assert_eq!(ctx.reg(3), 0, "breakpoint instruction not executed");

    // Resuming lets the instruction under the breakpoint through once.
    assert_eq!(ctx.run_to_stop(), ExceptionCause::Break);
    assert_eq!((ctx.reg(3), ctx.reg(4)), (3, 4));
    assert!(ctx.core().is_hwbreak(at(2)), "breakpoint stays armed");
}

#[test]
fn breakpoint_fires_again_on_the_next_pass() {
    // Loop twice through the breakpointed instruction.
    let mut ctx = TestContext::single_cycle_no_delay_slot().load_program(&[
        asm::addiu(1, 0, 2),
        asm::addiu(1, 1, -1),
        asm::bne(1, 0, -2),
        asm::brk(),
    ]);
    ctx.core_mut().insert_hwbreak(at(1));

    assert_eq!(ctx.run_to_stop(), ExceptionCause::HwBreak);
    assert_eq!(ctx.run_to_stop(), ExceptionCause::HwBreak);
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.run_to_stop(), ExceptionCause::Break);
    assert_eq!(ctx.reg(1), 0);
}

#[test]
fn skip_breakpoints_ignores_the_break_for_one_step() {
    let mut ctx = TestContext::single_cycle_no_delay_slot().load_program(&program());
    ctx.core_mut().insert_hwbreak(at(0));

    ctx.machine.processor_mut().step(true).unwrap();
    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.core().exception_count, 0);
}

#[test]
fn removed_breakpoint_no_longer_stops() {
    let mut ctx = TestContext::pipelined(HazardUnit::Stall).load_program(&program());
    ctx.core_mut().insert_hwbreak(at(1));
    ctx.core_mut().remove_hwbreak(at(1));
    assert!(!ctx.core().is_hwbreak(at(1)));

    assert_eq!(ctx.run_to_stop(), ExceptionCause::Break);
    assert_eq!(ctx.core().exception_count, 1);
}

#[rstest]
#[case::single_cycle(TestContext::single_cycle())]
#[case::pipelined(TestContext::pipelined(HazardUnit::StallForward))]
fn breakpoint_in_delay_slot_restarts_at_the_branch(#[case] ctx: TestContext) {
    let mut ctx = ctx.load_program(&[
        asm::j(PROGRAM_BASE + 16),
        asm::addiu(1, 0, 1),
        asm::addiu(2, 0, 2),
        asm::addiu(3, 0, 3),
        asm::brk(),
    ]);
    ctx.core_mut().insert_hwbreak(at(1));

    assert_eq!(ctx.run_to_stop(), ExceptionCause::HwBreak);
    assert_eq!(ctx.pc(), at(0));
    assert_eq!(ctx.reg(1), 0);

    // The jump runs again and its slot passes the breakpoint.
    assert_eq!(ctx.run_to_stop(), ExceptionCause::Break);
    assert_eq!((ctx.reg(1), ctx.reg(2), ctx.reg(3)), (1, 0, 0));
}

use mipsim_core::core::Core;
use mipsim_core::core::cpu::{ExceptionContext, ExceptionHandler};
use mockall::mock;

mock! {
    pub Handler {}

    impl ExceptionHandler for Handler {
        fn handle(&mut self, core: &mut Core, ctx: &ExceptionContext) -> bool;
    }
}

/// Emulates a system call: writes `$v0 = $a0 + 1` and resumes after the instruction.
#[derive(Debug, Default)]
pub struct IncrementSyscall {
    pub calls: usize,
}

impl ExceptionHandler for IncrementSyscall {
    fn handle(&mut self, core: &mut Core, ctx: &ExceptionContext) -> bool {
        self.calls += 1;
        let a0 = core.regs.read_gp_index(4).unwrap();
        core.regs.write_gp_index(2, a0 + 1).unwrap();
        core.regs.set_pc(ctx.next_addr);
        true
    }
}

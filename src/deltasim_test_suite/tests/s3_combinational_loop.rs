//! A testbench process that mirrors a DUT output straight back onto an
//! input it feeds never reaches a fixed point; the kernel reports a
//! `CombinationalLoop` diagnostic naming the still-dirty observables rather
//! than looping forever.

use deltasim_core::SchedulerError;
use deltasim_kernel::Scheduler;
use deltasim_test_suite::{LoopyDut, RecordingSink};

mod common;

#[test]
fn unbroken_feedback_is_reported_as_a_combinational_loop() {
    common::init_logging();
    let mut dut = LoopyDut::new();
    let mut scheduler = Scheduler::new();
    let a = scheduler.input(&dut.a);
    let b = scheduler.output(&dut.b);

    scheduler.process(&[b.any()], move |ctx| {
        let mirrored = ctx.read_output(b);
        ctx.write_input(a, mirrored);
    });

    let mut sink = RecordingSink::default();
    let err = scheduler.run(&mut dut, &mut sink, 10).unwrap_err();

    match err {
        SchedulerError::CombinationalLoop { at, dirty } => {
            assert_eq!(at, 0);
            assert!(!dirty.is_empty());
        }
        other => panic!("expected CombinationalLoop, got {other:?}"),
    }
}

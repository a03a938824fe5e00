//! A DUT-owned clock generator drives the outer loop on its own; the
//! waveform sink is dumped once per converged time step, at strictly
//! increasing times.

use deltasim_kernel::{RunOutcome, Scheduler};
use deltasim_test_suite::{ClockedDut, CounterDut, RecordingSink};

mod common;

/// A testbench-owned, self-rescheduling timed action toggles `clk` every 5
/// units starting at `t = 0`, and the DUT (which has no internal event queue
/// of its own) counts the resulting rising edges.
#[test]
fn testbench_driven_clock_yields_ten_posedges_in_one_hundred_units() {
    common::init_logging();
    let mut dut = CounterDut::new();
    let mut scheduler = Scheduler::new();
    let clk = scheduler.input(&dut.clk);

    fn toggle(clk: deltasim_kernel::InputPortId<bool>) -> impl FnMut(&mut deltasim_kernel::ProcessCtx<'_, '_, CounterDut>) {
        move |ctx| {
            let next = !ctx.read_input(clk);
            ctx.write_input(clk, next);
            ctx.schedule_after(5, toggle(clk));
        }
    }
    scheduler.schedule_after(5, toggle(clk));

    let mut sink = RecordingSink::default();
    let outcome = scheduler.run(&mut dut, &mut sink, 100).unwrap();

    assert!(matches!(outcome, RunOutcome::TimedOut { at: 100 }));
    assert_eq!(dut.count.get(), 10, "ten full posedges should have landed by t=100");
    assert_eq!(
        sink.times,
        (0..=100).step_by(5).collect::<Vec<_>>(),
        "dump must be called at 0, 5, 10, ..., 100"
    );
}

#[test]
fn clock_toggles_and_counts_rising_edges() {
    common::init_logging();
    let mut dut = ClockedDut::new(5);
    let mut scheduler = Scheduler::new();
    let _clk = scheduler.output(&dut.clk);
    let _count = scheduler.output(&dut.count);
    let mut sink = RecordingSink::default();

    let outcome = scheduler.run(&mut dut, &mut sink, 47).unwrap();

    assert!(matches!(outcome, RunOutcome::TimedOut { at: 45 }));
    assert_eq!(sink.times, vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45]);
    assert_eq!(dut.count.get(), 5);
}

#[test]
fn dump_times_are_strictly_increasing() {
    common::init_logging();
    let mut dut = ClockedDut::new(3);
    let mut scheduler = Scheduler::new();
    let _clk = scheduler.output(&dut.clk);
    let mut sink = RecordingSink::default();

    scheduler.run(&mut dut, &mut sink, 30).unwrap();

    assert!(sink.times.windows(2).all(|w| w[0] < w[1]));
}

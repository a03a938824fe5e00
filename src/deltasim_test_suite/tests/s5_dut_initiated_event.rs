//! Once the testbench stops scheduling anything, the DUT's own event queue
//! is still enough to carry the outer loop forward to the response, and the
//! run quiesces cleanly once neither side has further work. A process
//! sensitive to the output fires exactly once, at the SAMPLE boundary of
//! the delta where the DUT's memory transitions 0 -> 1.

use std::cell::RefCell;
use std::rc::Rc;

use deltasim_kernel::{RunOutcome, Scheduler};
use deltasim_test_suite::{HandshakeDut, RecordingSink};

mod common;

#[test]
fn dut_own_event_delivers_the_response_with_no_further_testbench_stimulus() {
    common::init_logging();
    let mut dut = HandshakeDut::new(9);
    let mut scheduler = Scheduler::new();
    let ack = scheduler.output(&dut.ack);

    let posedges = Rc::new(RefCell::new(0u32));
    let posedges_in_process = Rc::clone(&posedges);
    scheduler.process(&[ack.any()], move |ctx| {
        if ctx.output_posedge(ack) {
            *posedges_in_process.borrow_mut() += 1;
        }
    });

    let req = scheduler.input(&dut.req);
    scheduler.schedule_after(0, move |ctx| ctx.write_input(req, true));

    let mut sink = RecordingSink::default();
    let outcome = scheduler.run(&mut dut, &mut sink, 100).unwrap();

    assert_eq!(dut.ack.get(), true);
    assert_eq!(*posedges.borrow(), 1, "the ack posedge process must fire exactly once");
    assert!(matches!(outcome, RunOutcome::Quiescent { at: 9 }));
}

//! A testbench raises `req`, waits for the DUT's delayed `ack`, then drops
//! `req` and observes `ack` fall in turn.

use std::cell::RefCell;
use std::rc::Rc;

use deltasim_kernel::Scheduler;
use deltasim_test_suite::{HandshakeDut, RecordingSink};

mod common;

#[test]
fn ack_follows_req_after_the_dut_s_latency() {
    common::init_logging();
    let mut dut = HandshakeDut::new(7);
    let mut scheduler = Scheduler::new();
    let req = scheduler.input(&dut.req);
    let ack = scheduler.output(&dut.ack);

    let posedges = Rc::new(RefCell::new(Vec::new()));
    let posedges_in_process = Rc::clone(&posedges);
    scheduler.process(&[ack.any()], move |ctx| {
        if ctx.output_posedge(ack) {
            posedges_in_process.borrow_mut().push(ctx.now());
        }
    });

    scheduler.schedule_after(0, move |ctx| ctx.write_input(req, true));
    scheduler.schedule_after(20, move |ctx| ctx.write_input(req, false));

    let mut sink = RecordingSink::default();
    scheduler.run(&mut dut, &mut sink, 40).unwrap();

    assert_eq!(*posedges.borrow(), vec![7]);
    assert!(!dut.ack.get(), "ack should have fallen once req dropped");
}

//! Reusable DUT and sink test doubles for the scenario tests.
//!
//! Each double owns its own port memory as plain `Cell<T>` fields — the DUT
//! outlives the `Scheduler` that borrows them — and implements only [`Dut`]'s
//! five operations, the same boundary a real compiled hardware model would
//! cross.

use std::cell::Cell;

use deltasim_core::{Dut, WaveformSink};

/// A free-running clock generator with a rising-edge counter.
///
/// Has no inputs: the only thing that ever makes `Scheduler::run`'s outer
/// loop advance past the initial `t = 0` pass is this DUT's own event queue,
/// which is why `half_period` alone is enough for [`ClockedDut::eval`] to
/// tell "my event is due" apart from an unrelated wake-up.
pub struct ClockedDut {
    pub clk: Cell<bool>,
    pub count: Cell<u32>,
    half_period: u64,
    next_toggle: u64,
}

impl ClockedDut {
    pub fn new(half_period: u64) -> Self {
        assert!(half_period > 0, "half_period must be nonzero");
        Self {
            clk: Cell::new(false),
            count: Cell::new(0),
            half_period,
            next_toggle: half_period,
        }
    }
}

impl Dut for ClockedDut {
    fn eval(&mut self, now: u64) {
        if now < self.next_toggle {
            return;
        }
        let risen = !self.clk.get();
        self.clk.set(risen);
        if risen {
            self.count.set(self.count.get() + 1);
        }
        self.next_toggle = now + self.half_period;
    }

    fn events_pending(&self) -> bool {
        true
    }

    fn next_time_slot(&self) -> u64 {
        self.next_toggle
    }

    fn finish(&mut self) {}

    fn finished(&self) -> bool {
        false
    }
}

/// A 1-bit counter incrementing on `posedge clk`, where `clk` is driven
/// entirely by the testbench: no internal event queue of its own.
pub struct CounterDut {
    pub clk: Cell<bool>,
    pub count: Cell<u32>,
    prev_clk: bool,
}

impl CounterDut {
    pub fn new() -> Self {
        Self {
            clk: Cell::new(false),
            count: Cell::new(0),
            prev_clk: false,
        }
    }
}

impl Default for CounterDut {
    fn default() -> Self {
        Self::new()
    }
}

impl Dut for CounterDut {
    fn eval(&mut self, _now: u64) {
        let clk = self.clk.get();
        if clk && !self.prev_clk {
            self.count.set(self.count.get() + 1);
        }
        self.prev_clk = clk;
    }

    fn events_pending(&self) -> bool {
        false
    }

    fn next_time_slot(&self) -> u64 {
        u64::MAX
    }

    fn finish(&mut self) {}

    fn finished(&self) -> bool {
        false
    }
}

/// A request/acknowledge handshake with fixed response latency.
///
/// `req` is the input the testbench drives; `ack` is the output the DUT
/// raises `latency` ticks after observing `req` asserted, and drops once
/// `req` deasserts.
pub struct HandshakeDut {
    pub req: Cell<bool>,
    pub ack: Cell<bool>,
    pub finish_calls: Cell<u32>,
    latency: u64,
    pending_ack_at: Option<u64>,
    finished: bool,
}

impl HandshakeDut {
    pub fn new(latency: u64) -> Self {
        Self {
            req: Cell::new(false),
            ack: Cell::new(false),
            finish_calls: Cell::new(0),
            latency,
            pending_ack_at: None,
            finished: false,
        }
    }
}

impl Dut for HandshakeDut {
    fn eval(&mut self, now: u64) {
        if self.req.get() && !self.ack.get() && self.pending_ack_at.is_none() {
            self.pending_ack_at = Some(now + self.latency);
        }
        if let Some(at) = self.pending_ack_at {
            if now >= at {
                self.ack.set(true);
                self.pending_ack_at = None;
            }
        }
        if !self.req.get() && self.ack.get() {
            self.ack.set(false);
        }
    }

    fn events_pending(&self) -> bool {
        self.pending_ack_at.is_some()
    }

    fn next_time_slot(&self) -> u64 {
        self.pending_ack_at.unwrap_or(u64::MAX)
    }

    fn finish(&mut self) {
        self.finished = true;
        self.finish_calls.set(self.finish_calls.get() + 1);
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

/// A combinational pass-through (`b = !a`) with no internal events of its
/// own — wiring its output back into its input drives a testbench-side
/// feedback loop into a combinational loop.
pub struct LoopyDut {
    pub a: Cell<bool>,
    pub b: Cell<bool>,
}

impl LoopyDut {
    pub fn new() -> Self {
        Self {
            a: Cell::new(false),
            b: Cell::new(false),
        }
    }
}

impl Default for LoopyDut {
    fn default() -> Self {
        Self::new()
    }
}

impl Dut for LoopyDut {
    fn eval(&mut self, _now: u64) {
        self.b.set(!self.a.get());
    }

    fn events_pending(&self) -> bool {
        false
    }

    fn next_time_slot(&self) -> u64 {
        u64::MAX
    }

    fn finish(&mut self) {}

    fn finished(&self) -> bool {
        false
    }
}

/// A [`WaveformSink`] that records every `dump` call's time, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub times: Vec<u64>,
}

impl WaveformSink for RecordingSink {
    fn dump(&mut self, time: u64) {
        self.times.push(time);
    }
}

//! The timed-event queue.
//!
//! A min-heap keyed by `(fire_time, insertion_seq)` so events scheduled for
//! the same tick fire in deterministic, insertion order. A richer queue
//! might additionally track heap positions so timeouts can be cancelled in
//! `O(log n)`, but per-event cancellation is out of scope for this kernel,
//! so a plain [`std::collections::BinaryHeap`] over [`core::cmp::Reverse`]
//! is enough here.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::process::ProcessCtx;
use crate::scheduler::Scheduler;

/// A scheduled action awaiting its fire time.
///
/// Ordering only ever considers `fire_time` and `seq`; the action itself is
/// neither `Eq` nor `Ord`.
pub(crate) struct TimedEvent<'d, D> {
    fire_time: u64,
    seq: u64,
    action: Box<dyn FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static>,
}

impl<'d, D> TimedEvent<'d, D> {
    pub(crate) fn fire_time(&self) -> u64 {
        self.fire_time
    }
}

impl<'d, D> PartialEq for TimedEvent<'d, D> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl<'d, D> Eq for TimedEvent<'d, D> {}

impl<'d, D> PartialOrd for TimedEvent<'d, D> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<'d, D> Ord for TimedEvent<'d, D> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.fire_time, self.seq).cmp(&(other.fire_time, other.seq))
    }
}

/// The scheduler's merged timeline of testbench-scheduled actions.
///
/// Does not include the DUT's own internal event queue — `Scheduler::run`
/// consults `Dut::next_time_slot` separately.
pub(crate) struct EventQueue<'d, D> {
    heap: BinaryHeap<Reverse<TimedEvent<'d, D>>>,
    next_seq: u64,
}

impl<'d, D> EventQueue<'d, D> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn push(
        &mut self,
        fire_time: u64,
        action: Box<dyn FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static>,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(TimedEvent {
            fire_time,
            seq,
            action,
        }));
    }

    /// The earliest pending fire time, if any event is queued.
    pub(crate) fn next_fire_time(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.fire_time)
    }

    /// Pop and run every event that was already due at or before `time`
    /// *when this call began*, in `(fire_time, seq)` order, each against a
    /// freshly built [`ProcessCtx`].
    ///
    /// The due set is snapshotted up front rather than re-peeked after each
    /// action: a self-rescheduling action (a clock generator) pops itself,
    /// runs, and may push a new event back with `fire_time == time`. That
    /// new event must only be picked up by the *next* outer-loop iteration
    /// at the same wall time, not this call — otherwise the action would
    /// re-fire itself within a single `drain_due`, breaking the phase
    /// separation between successive time-arbitration iterations.
    pub(crate) fn drain_due(scheduler: &mut Scheduler<'d, D>, dut: &mut D, time: u64) -> bool {
        let mut due = Vec::new();
        while matches!(scheduler.events.heap.peek(), Some(Reverse(e)) if e.fire_time <= time) {
            let Reverse(event) = scheduler.events.heap.pop().unwrap();
            due.push(event);
        }
        let ran_any = !due.is_empty();
        for mut event in due {
            let mut ctx = ProcessCtx::new(scheduler, dut);
            (event.action)(&mut ctx);
        }
        ran_any
    }
}

//! The delta-cycle kernel and time-arbitration loop.
//!
//! `Scheduler<'d, D>` owns every `Observable`/`Process`; the DUT itself is
//! never owned, only borrowed for the duration of [`Scheduler::run`] — the
//! kernel-owned state is kept separate from the user-supplied DUT it
//! drives, which is generic over `D: Dut`.

use std::cell::Cell;

use deltasim_core::{DirtyObservable, Dut, ObservableId, ObservableKind, PortScalar, SchedulerError, WaveformSink};

use crate::event_queue::EventQueue;
use crate::handle::{AnyObservableId, InputPortId, OutputPortId, ProcessId, SignalId};
use crate::port::{InputSlot, OutputSlot};
use crate::process::{Process, ProcessCtx};
use crate::signal::SignalSlot;

/// The default combinational-loop convergence bound.
pub const DEFAULT_LOOP_BOUND: usize = 1000;

/// How [`Scheduler::schedule_at`] (and [`ProcessCtx::schedule_at`]) handle a
/// requested time before the current simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PastTimePolicy {
    /// Clamp the request up to `now`. The default.
    CoerceToNow,
    /// Treat the request as a programmer error and panic, carrying
    /// [`SchedulerError::PastTimeRejected`]'s message.
    Reject,
}

/// How a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The DUT raised its finish flag.
    Finished { at: u64 },
    /// The `timeout` tick passed with no finish flag observed.
    TimedOut { at: u64 },
    /// Neither the testbench nor the DUT has any further event queued.
    Quiescent { at: u64 },
}

/// The scheduler. Generic over the DUT type `D`; `'d` is the lifetime of the
/// `Cell<T>` port memory registered via [`Scheduler::input`]/`::output`.
pub struct Scheduler<'d, D> {
    pub(crate) ports_in: Vec<InputSlot<'d>>,
    pub(crate) ports_out: Vec<OutputSlot<'d>>,
    pub(crate) signals: Vec<SignalSlot>,
    pub(crate) processes: Vec<Process<'d, D>>,
    pub(crate) events: EventQueue<'d, D>,
    pub(crate) now: u64,
    loop_bound: usize,
    past_time_policy: PastTimePolicy,
}

impl<'d, D> Default for Scheduler<'d, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d, D> Scheduler<'d, D> {
    pub fn new() -> Self {
        Self {
            ports_in: Vec::new(),
            ports_out: Vec::new(),
            signals: Vec::new(),
            processes: Vec::new(),
            events: EventQueue::new(),
            now: 0,
            loop_bound: DEFAULT_LOOP_BOUND,
            past_time_policy: PastTimePolicy::CoerceToNow,
        }
    }

    /// Override the combinational-loop convergence bound (default
    /// [`DEFAULT_LOOP_BOUND`]).
    pub fn with_loop_bound(mut self, bound: usize) -> Self {
        self.loop_bound = bound;
        self
    }

    /// Override how `schedule_at` treats a past-time request (default
    /// [`PastTimePolicy::CoerceToNow`]).
    pub fn with_past_time_policy(mut self, policy: PastTimePolicy) -> Self {
        self.past_time_policy = policy;
        self
    }

    /// The current simulation time.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Register an `InputPort<T>` bound to `cell` (testbench→DUT boundary).
    pub fn input<T: PortScalar>(&mut self, cell: &'d Cell<T>) -> InputPortId<T> {
        let index = self.ports_in.len();
        self.ports_in.push(InputSlot::new(cell));
        InputPortId::new(index)
    }

    /// Register an `OutputPort<T>` bound to `cell` (DUT→testbench boundary).
    pub fn output<T: PortScalar>(&mut self, cell: &'d Cell<T>) -> OutputPortId<T> {
        let index = self.ports_out.len();
        self.ports_out.push(OutputSlot::new(cell));
        OutputPortId::new(index)
    }

    /// Register an `InternalSignal<T>` initialized to `initial`.
    pub fn signal<T: PortScalar>(&mut self, initial: T) -> SignalId<T> {
        let index = self.signals.len();
        self.signals.push(SignalSlot::new(initial.to_u64()));
        SignalId::new(index)
    }

    /// Register a process sensitive to `sensitivity`. Runs once up front if
    /// `sensitivity` is empty, and again whenever a dependency changes.
    pub fn process(
        &mut self,
        sensitivity: &[AnyObservableId],
        callback: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static,
    ) -> ProcessId {
        let id = ProcessId(self.processes.len());
        self.processes
            .push(Process::new(Box::new(callback), sensitivity.to_vec(), false));
        for &obs in sensitivity {
            self.add_dependent(obs, id);
        }
        id
    }

    /// Register a process that runs on every delta, unconditionally.
    pub fn always(&mut self, callback: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static) -> ProcessId {
        let id = ProcessId(self.processes.len());
        self.processes.push(Process::new(Box::new(callback), Vec::new(), true));
        id
    }

    /// Schedule `action` to run `delay` ticks from now.
    pub fn schedule_after(
        &mut self,
        delay: u64,
        action: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static,
    ) {
        let at = self.now.saturating_add(delay);
        self.events.push(at, Box::new(action));
    }

    /// Schedule `action` to run at absolute time `time`, subject to this
    /// scheduler's [`PastTimePolicy`].
    pub fn schedule_at(&mut self, time: u64, action: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static) {
        self.schedule_at_boxed(time, Box::new(action));
    }

    pub(crate) fn schedule_at_boxed(
        &mut self,
        time: u64,
        action: Box<dyn FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static>,
    ) {
        let at = match self.past_time_policy {
            PastTimePolicy::CoerceToNow => time.max(self.now),
            PastTimePolicy::Reject if time < self.now => {
                panic!(
                    "{}",
                    SchedulerError::PastTimeRejected {
                        requested: time,
                        now: self.now
                    }
                )
            }
            PastTimePolicy::Reject => time,
        };
        self.events.push(at, action);
    }

    fn add_dependent(&mut self, obs: AnyObservableId, id: ProcessId) {
        match obs.kind() {
            ObservableKind::Input => self.ports_in[obs.index()].add_dependent(id),
            ObservableKind::Output => self.ports_out[obs.index()].add_dependent(id),
            ObservableKind::Signal => self.signals[obs.index()].add_dependent(id),
        }
    }

    /// The observables still carrying an uncommitted (staged) write when the
    /// convergence bound was exceeded: `has_pending()`, not the post-commit
    /// `changed()` flag the REACT phase keys off of.
    fn collect_dirty(&self) -> Vec<DirtyObservable> {
        let mut dirty = Vec::new();
        for (i, slot) in self.ports_in.iter().enumerate() {
            if slot.has_pending() {
                dirty.push(DirtyObservable {
                    id: ObservableId::new(ObservableKind::Input, i),
                });
            }
        }
        for (i, slot) in self.signals.iter().enumerate() {
            if slot.has_pending() {
                dirty.push(DirtyObservable {
                    id: ObservableId::new(ObservableKind::Signal, i),
                });
            }
        }
        dirty
    }
}

impl<'d, D: Dut> Scheduler<'d, D> {
    /// Run the simulation to completion: an initial full delta pass at
    /// `t = 0`, then the time-arbitration outer loop merging the testbench's
    /// event queue with the DUT's own, until the DUT finishes, no further
    /// event exists from either side, or `timeout` elapses.
    pub fn run(
        &mut self,
        dut: &mut D,
        sink: &mut impl WaveformSink,
        timeout: u64,
    ) -> Result<RunOutcome, SchedulerError> {
        self.now = 0;
        log::debug!("run: initial delta pass at t=0");
        EventQueue::drain_due(self, dut, 0);
        self.run_delta_loop(dut)?;
        sink.dump(0);
        if dut.finished() {
            log::debug!("run: DUT finished at t=0");
            dut.finish();
            return Ok(RunOutcome::Finished { at: 0 });
        }

        loop {
            let t_tb = self.events.next_fire_time();
            let t_dut = if dut.events_pending() {
                Some(dut.next_time_slot())
            } else {
                None
            };
            let next = match (t_tb, t_dut) {
                (None, None) => {
                    log::debug!("run: quiescent at t={}", self.now);
                    dut.finish();
                    return Ok(RunOutcome::Quiescent { at: self.now });
                }
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (Some(a), Some(b)) => a.min(b),
            };
            if next > timeout {
                log::debug!("run: timed out at t={} (next event at {next})", self.now);
                dut.finish();
                return Ok(RunOutcome::TimedOut { at: self.now });
            }
            self.now = next;
            log::trace!("run: advancing to t={}", self.now);
            // Tied t_tb == t_dut: testbench events drain first, at the same
            // wall time, before the DUT's own slot is observed via EVAL.
            EventQueue::drain_due(self, dut, next);
            self.run_delta_loop(dut)?;
            sink.dump(self.now);
            if dut.finished() {
                log::debug!("run: DUT finished at t={}", self.now);
                dut.finish();
                return Ok(RunOutcome::Finished { at: self.now });
            }
        }
    }

    /// The 5-phase inner loop: COMMIT, EVAL, SAMPLE, REACT, CONVERGE,
    /// iterated until a fixed point or `loop_bound` deltas.
    fn run_delta_loop(&mut self, dut: &mut D) -> Result<(), SchedulerError> {
        log::trace!("delta loop: enter at t={}", self.now);
        let mut first_delta = true;
        for delta in 0..self.loop_bound {
            log::trace!("delta loop: delta {delta} at t={}", self.now);
            // COMMIT
            let mut any_input_changed = false;
            for i in 0..self.ports_in.len() {
                if self.ports_in[i].commit() {
                    any_input_changed = true;
                    for pid in self.ports_in[i].dependents().to_vec() {
                        self.processes[pid.0].set_triggered(true);
                    }
                }
            }
            let mut any_signal_changed = false;
            for i in 0..self.signals.len() {
                if self.signals[i].commit() {
                    any_signal_changed = true;
                    for pid in self.signals[i].dependents().to_vec() {
                        self.processes[pid.0].set_triggered(true);
                    }
                }
            }

            // EVAL: mandatory on the first delta of the time step, or
            // whenever committed state moved, or the DUT's own queue has an
            // event due at or before `now`.
            let dut_event_due = dut.events_pending() && dut.next_time_slot() <= self.now;
            if first_delta || any_input_changed || any_signal_changed || dut_event_due {
                dut.eval(self.now);
            }
            first_delta = false;

            // SAMPLE
            for i in 0..self.ports_out.len() {
                if self.ports_out[i].sample() {
                    for pid in self.ports_out[i].dependents().to_vec() {
                        self.processes[pid.0].set_triggered(true);
                    }
                }
            }

            // REACT: registration order.
            for i in 0..self.processes.len() {
                if self.processes[i].is_triggered() {
                    Process::run(ProcessId(i), self, dut);
                    self.processes[i].clear_triggered();
                }
            }

            // CONVERGE: a fixed point is reached once REACT has staged no
            // further NBA writes — `any_*_changed` above only tells EVAL
            // whether *this* delta's commit moved anything, not whether
            // REACT just queued work for the next one.
            let pending = self.ports_in.iter().any(|s| s.has_pending())
                || self.signals.iter().any(|s| s.has_pending());
            if !pending {
                log::trace!("delta loop: converged at t={}", self.now);
                return Ok(());
            }
        }

        let dirty = self.collect_dirty();
        log::warn!(
            "delta loop: combinational loop at t={}, {} observable(s) still dirty after {} deltas",
            self.now,
            dirty.len(),
            self.loop_bound,
        );
        Err(SchedulerError::CombinationalLoop {
            at: self.now,
            dirty,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use deltasim_core::{Dut, WaveformSink};

    use super::*;

    /// A `Dut` with no internal events and no finish condition — just
    /// enough to drive `Scheduler::run` in tests that only care about the
    /// timed-event queue, not DUT behavior.
    struct InertDut;

    impl Dut for InertDut {
        fn eval(&mut self, _now: u64) {}
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

    struct DiscardSink;

    impl WaveformSink for DiscardSink {
        fn dump(&mut self, _time: u64) {}
    }

    fn init_logging() {
        let _ = env_logger::try_init();
    }

    #[test]
    fn schedule_at_in_the_past_is_coerced_to_now_by_default() {
        init_logging();
        let mut dut = InertDut;
        let cell = Cell::new(false);
        let mut scheduler: Scheduler<'_, InertDut> = Scheduler::new();
        let input = scheduler.input(&cell);

        scheduler.schedule_after(10, move |ctx| {
            // At t=10, request t=3 (in the past): coerced up to 10.
            ctx.schedule_at(3, move |ctx| ctx.write_input(input, true));
        });

        let mut sink = DiscardSink;
        scheduler.run(&mut dut, &mut sink, 10).unwrap();
        assert!(cell.get(), "the coerced action should have fired by t=10");
    }

    #[test]
    fn schedule_at_in_the_past_panics_under_the_reject_policy() {
        init_logging();
        let mut scheduler: Scheduler<'_, InertDut> =
            Scheduler::new().with_past_time_policy(PastTimePolicy::Reject);
        scheduler.now = 10;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scheduler.schedule_at(3, |_ctx| {});
        }));
        assert!(result.is_err(), "scheduling into the past must panic under Reject");
    }

    #[test]
    fn schedule_at_in_the_future_is_unaffected_by_either_policy() {
        init_logging();
        let mut dut = InertDut;
        let cell = Cell::new(0u8);
        let mut scheduler: Scheduler<'_, InertDut> =
            Scheduler::new().with_past_time_policy(PastTimePolicy::Reject);
        let sig = scheduler.input(&cell);
        scheduler.schedule_at(5, move |ctx| ctx.write_input(sig, 1));

        let mut sink = DiscardSink;
        let outcome = scheduler.run(&mut dut, &mut sink, 5).unwrap();
        assert_eq!(cell.get(), 1);
        assert!(matches!(outcome, RunOutcome::Quiescent { at: 5 }));
    }
}

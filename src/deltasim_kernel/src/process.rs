//! The process registry and [`ProcessCtx`], the view a running
//! process/timed action gets onto its owning
//! [`Scheduler`].
//!
//! A `Process`'s callback is stored as `Option<Box<dyn FnMut(...)>>` rather
//! than a plain `Box<dyn FnMut(...)>`: invoking it needs `&mut Scheduler`,
//! but the callback itself lives inside that same `Scheduler`'s registry, so
//! the callback is `take()`n out before the call and put back afterwards.
//! Timed actions popped off [`crate::event_queue::EventQueue`] don't have
//! this problem — they are owned outright once popped, not borrowed from
//! state that also needs mutating.

use deltasim_core::PortScalar;

use crate::handle::{AnyObservableId, InputPortId, OutputPortId, ProcessId, SignalId};
use crate::scheduler::Scheduler;

pub(crate) struct Process<'d, D> {
    callback: Option<Box<dyn FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static>>,
    sensitivity: Vec<AnyObservableId>,
    always_active: bool,
    triggered: bool,
}

impl<'d, D> Process<'d, D> {
    pub(crate) fn new(
        callback: Box<dyn FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static>,
        sensitivity: Vec<AnyObservableId>,
        always_active: bool,
    ) -> Self {
        // A process with a non-empty sensitivity list only fires once one of
        // its dependencies actually changes — it must not run before the
        // edge it is watching for, or a process watching a DUT output for a
        // single rising edge would see a spurious extra call at setup. A
        // process registered with an *empty* sensitivity list has no other
        // way to ever run, so the only sensible reading is the HDL
        // "initial block" one: it fires once, up front, like a one-shot
        // setup action.
        let triggered = sensitivity.is_empty() && !always_active;
        Self {
            callback: Some(callback),
            sensitivity,
            always_active,
            triggered,
        }
    }

    pub(crate) fn is_triggered(&self) -> bool {
        self.triggered || self.always_active
    }

    pub(crate) fn set_triggered(&mut self, triggered: bool) {
        self.triggered = triggered;
    }

    pub(crate) fn clear_triggered(&mut self) {
        self.triggered = false;
    }

    /// Run this process's callback against `scheduler`/`dut`, temporarily
    /// detaching it from the registry so `scheduler` can be borrowed
    /// mutably by the callback body.
    pub(crate) fn run(id: ProcessId, scheduler: &mut Scheduler<'d, D>, dut: &mut D) {
        let mut callback = scheduler.processes[id.0]
            .callback
            .take()
            .expect("process callback re-entered: a process must not trigger itself recursively");
        let mut ctx = ProcessCtx::new(scheduler, dut);
        callback(&mut ctx);
        scheduler.processes[id.0].callback = Some(callback);
    }
}

/// The view a process callback, `always`-block, or timed action gets onto
/// its scheduler: reads of any observable's current/previous value, staged
/// (NBA) writes to inputs and signals, and further scheduling.
///
/// Deliberately not `Scheduler` itself — registration methods
/// (`Scheduler::input`, `::process`, ...) are only available before/between
/// runs, not from inside a callback, so they are not exposed here. `dut` is
/// threaded in separately from `scheduler` rather than stored on it: the DUT
/// is only ever borrowed for the duration of `Scheduler::run`, never owned
/// by the scheduler.
pub struct ProcessCtx<'a, 'd, D> {
    scheduler: &'a mut Scheduler<'d, D>,
    dut: &'a mut D,
}

impl<'a, 'd, D> ProcessCtx<'a, 'd, D> {
    pub(crate) fn new(scheduler: &'a mut Scheduler<'d, D>, dut: &'a mut D) -> Self {
        Self { scheduler, dut }
    }

    /// The current simulation time.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Direct, read-only access to the DUT, e.g. to inspect model-specific
    /// state a port doesn't expose.
    pub fn dut(&self) -> &D {
        &*self.dut
    }

    /// Mutable access to the DUT. Processes are not expected to call
    /// `Dut::eval` themselves (the kernel drives EVAL), but some testbenches
    /// poke DUT-specific knobs outside the port/signal model.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut *self.dut
    }

    pub fn read_input<T: PortScalar>(&self, port: InputPortId<T>) -> T {
        T::from_u64(self.scheduler.ports_in[port.id.index()].current())
    }

    pub fn previous_input<T: PortScalar>(&self, port: InputPortId<T>) -> T {
        T::from_u64(self.scheduler.ports_in[port.id.index()].previous())
    }

    pub fn input_changed<T: PortScalar>(&self, port: InputPortId<T>) -> bool {
        self.scheduler.ports_in[port.id.index()].dirty()
    }

    /// Rising-edge condition: `previous` was zero/false, `current` is
    /// nonzero/true.
    pub fn input_posedge<T: PortScalar>(&self, port: InputPortId<T>) -> bool {
        let slot = &self.scheduler.ports_in[port.id.index()];
        slot.dirty() && !T::from_u64(slot.previous()).is_nonzero() && T::from_u64(slot.current()).is_nonzero()
    }

    pub fn input_negedge<T: PortScalar>(&self, port: InputPortId<T>) -> bool {
        let slot = &self.scheduler.ports_in[port.id.index()];
        slot.dirty() && T::from_u64(slot.previous()).is_nonzero() && !T::from_u64(slot.current()).is_nonzero()
    }

    pub fn read_output<T: PortScalar>(&self, port: OutputPortId<T>) -> T {
        T::from_u64(self.scheduler.ports_out[port.id.index()].current())
    }

    pub fn previous_output<T: PortScalar>(&self, port: OutputPortId<T>) -> T {
        T::from_u64(self.scheduler.ports_out[port.id.index()].previous())
    }

    pub fn output_changed<T: PortScalar>(&self, port: OutputPortId<T>) -> bool {
        self.scheduler.ports_out[port.id.index()].dirty()
    }

    /// Rising-edge condition: `previous` was zero/false, `current` is
    /// nonzero/true.
    pub fn output_posedge<T: PortScalar>(&self, port: OutputPortId<T>) -> bool {
        let slot = &self.scheduler.ports_out[port.id.index()];
        slot.dirty() && !T::from_u64(slot.previous()).is_nonzero() && T::from_u64(slot.current()).is_nonzero()
    }

    pub fn output_negedge<T: PortScalar>(&self, port: OutputPortId<T>) -> bool {
        let slot = &self.scheduler.ports_out[port.id.index()];
        slot.dirty() && T::from_u64(slot.previous()).is_nonzero() && !T::from_u64(slot.current()).is_nonzero()
    }

    pub fn read_signal<T: PortScalar>(&self, signal: SignalId<T>) -> T {
        T::from_u64(self.scheduler.signals[signal.id.index()].current())
    }

    pub fn previous_signal<T: PortScalar>(&self, signal: SignalId<T>) -> T {
        T::from_u64(self.scheduler.signals[signal.id.index()].previous())
    }

    pub fn signal_changed<T: PortScalar>(&self, signal: SignalId<T>) -> bool {
        self.scheduler.signals[signal.id.index()].dirty()
    }

    /// Rising-edge condition: `previous` was zero/false, `current` is
    /// nonzero/true.
    pub fn signal_posedge<T: PortScalar>(&self, signal: SignalId<T>) -> bool {
        let slot = &self.scheduler.signals[signal.id.index()];
        slot.dirty() && !T::from_u64(slot.previous()).is_nonzero() && T::from_u64(slot.current()).is_nonzero()
    }

    pub fn signal_negedge<T: PortScalar>(&self, signal: SignalId<T>) -> bool {
        let slot = &self.scheduler.signals[signal.id.index()];
        slot.dirty() && T::from_u64(slot.previous()).is_nonzero() && !T::from_u64(slot.current()).is_nonzero()
    }

    /// Stage a write to an input port. Takes effect at the start of the next
    /// delta cycle; a second write to the same port in the same delta
    /// collapses onto this one.
    pub fn write_input<T: PortScalar>(&mut self, port: InputPortId<T>, value: T) {
        self.scheduler.ports_in[port.id.index()].stage(value.to_u64());
    }

    /// Stage an NBA write to an internal signal. Same next-delta, last-write
    /// wins semantics as [`ProcessCtx::write_input`].
    pub fn write_signal<T: PortScalar>(&mut self, signal: SignalId<T>, value: T) {
        self.scheduler.signals[signal.id.index()].stage(value.to_u64());
    }

    /// Schedule `action` to run `delay` ticks from now.
    pub fn schedule_after(
        &mut self,
        delay: u64,
        action: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static,
    ) {
        let at = self.scheduler.now.saturating_add(delay);
        self.scheduler.events.push(at, Box::new(action));
    }

    /// Schedule `action` to run at absolute time `time`.
    ///
    /// `time < now` is coerced to `now` by default, or rejected, depending on
    /// `Scheduler`'s configured [`crate::scheduler::PastTimePolicy`]
    /// The coerced/rejected decision happens inside
    /// `Scheduler::schedule_at`, which this forwards to so mid-run scheduling
    /// from a callback honors the same policy as pre-run setup.
    pub fn schedule_at(&mut self, time: u64, action: impl FnMut(&mut ProcessCtx<'_, 'd, D>) + 'static) {
        self.scheduler.schedule_at_boxed(time, Box::new(action));
    }
}

//! The DUT capability contract.
//!
//! The DUT is an opaque, externally compiled hardware model. The kernel
//! never inspects its internals — it only ever calls the five operations
//! below, at fixed points in the delta-cycle and time-arbitration loops
//! (`eval()` during EVAL, `events_pending`/`next_time_slot` while computing
//! the outer loop's next wall time, `finished` after every delta, `final()`
//! once at shutdown).

/// An externally compiled hardware model under test.
///
/// Port memory (the raw mutable cells `InputPort`/`OutputPort` bind to) is
/// not part of this trait — it is addressable memory stable for the DUT's
/// lifetime, which `deltasim_kernel` models as borrowed `&Cell<T>`
/// references handed to `Scheduler::input`/`::output` directly, not as an
/// operation on `Dut` itself.
pub trait Dut {
    /// Evaluate one round of internal activity at `now`.
    ///
    /// Called during EVAL whenever an input was committed this delta, an
    /// internal signal changed this delta, the DUT reports pending events at
    /// or before the current time, or this is the first delta of the time
    /// step. `now` is passed through rather than left for the DUT to infer,
    /// since EVAL can fire at a wall time earlier than the DUT's own next
    /// scheduled event (e.g. the mandatory first delta, or a testbench-driven
    /// input change) and a time-based DUT model (a clock generator, a timer)
    /// has no other way to distinguish "my event is due" from "something
    /// else woke me up".
    fn eval(&mut self, now: u64);

    /// True iff the DUT has time-based internal events queued.
    fn events_pending(&self) -> bool;

    /// The earliest internal event time. Only meaningful when
    /// [`Dut::events_pending`] is true.
    fn next_time_slot(&self) -> u64;

    /// Terminate-side cleanup after the run.
    ///
    /// `final` is a reserved word in Rust, so the method is spelled `finish`
    /// here.
    fn finish(&mut self);

    /// The DUT-raised finish flag, observed after every converged delta.
    fn finished(&self) -> bool;
}

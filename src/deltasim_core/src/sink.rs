//! The waveform sink contract.

/// An opaque waveform-dumping collaborator.
///
/// The kernel calls [`WaveformSink::dump`] once per converged time step,
/// plus one additional call at `t = 0` before the outer loop begins.
pub trait WaveformSink {
    /// Record the scheduler's current observable state at `time`.
    fn dump(&mut self, time: u64);
}

/// A [`WaveformSink`] that discards every call.
///
/// Useful for tests and for testbenches that only care about `Scheduler`'s
/// return value, not a waveform trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WaveformSink for NullSink {
    fn dump(&mut self, _time: u64) {}
}

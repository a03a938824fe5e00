//! The scheduler's error taxonomy.
//!
//! Only simulation failures the caller can meaningfully recover from or
//! report are modeled here. Programmer errors that indicate a bug in the
//! testbench (e.g. using a handle from a different `Scheduler`) panic
//! instead of returning `Result` — they are defects, not recoverable
//! conditions. DUT-raised termination and timeouts are *not* errors: they
//! are reported through `RunOutcome` in `deltasim_kernel`. User callback
//! panics are never caught here; they unwind through the kernel untouched.

use core::fmt;

use crate::observable::ObservableId;

/// An `Observable` that was still dirty when a combinational-loop diagnostic
/// fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyObservable {
    pub id: ObservableId,
}

/// Simulation failures the scheduler reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The delta loop did not reach a fixed point within the configured
    /// bound.
    CombinationalLoop {
        /// The wall time at which the loop was detected.
        at: u64,
        /// The observables still dirty when the bound was exceeded.
        dirty: Vec<DirtyObservable>,
    },
    /// `schedule_at(t)` was called with `t < now` while the scheduler was
    /// configured to reject rather than coerce such requests.
    PastTimeRejected {
        /// The time that was requested.
        requested: u64,
        /// The current simulation time.
        now: u64,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CombinationalLoop { at, dirty } => write!(
                f,
                "combinational loop detected at t={at}: {} observable(s) still dirty after the convergence bound ({})",
                dirty.len(),
                dirty
                    .iter()
                    .map(|d| d.id.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Self::PastTimeRejected { requested, now } => write!(
                f,
                "schedule_at({requested}) rejected: requested time is before the current time ({now})"
            ),
        }
    }
}

impl std::error::Error for SchedulerError {}

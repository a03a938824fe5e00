//! The `Observable` capability: the common base shared by `InputPort`,
//! `OutputPort`, and `InternalSignal`.
//!
//! The three concrete variants are owned exclusively by the scheduler;
//! everything outside the kernel crate only ever holds an [`ObservableId`]
//! — a small `Copy` handle, not a reference. This keeps the dependency
//! graph acyclic even though the sensitivity graph it describes is not: an
//! `Observable` records the *ids* of the processes sensitive to it, and a
//! process registry owns the callbacks.

use core::fmt;

/// Which of the three `Observable` variants an [`ObservableId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservableKind {
    /// Testbench→DUT boundary (`InputPort<T>`).
    Input,
    /// DUT→Testbench boundary (`OutputPort<T>`).
    Output,
    /// Testbench-only NBA state (`InternalSignal<T>`).
    Signal,
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
            Self::Signal => f.write_str("signal"),
        }
    }
}

/// An opaque, `Copy` handle to an `Observable` owned by the scheduler.
///
/// Handles are stable for the scheduler's lifetime and carry no borrow —
/// registration functions (`Scheduler::input`, `::output`, `::signal`)
/// return these rather than references, so user setup code can freely store
/// them in `Vec`s, structs, or closures without fighting the borrow checker
/// against the `Scheduler` they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservableId {
    kind: ObservableKind,
    index: usize,
}

impl ObservableId {
    /// Construct a handle. Only `deltasim_kernel` is expected to call this;
    /// it is public so the kernel crate (a separate crate from this one)
    /// can construct it.
    pub fn new(kind: ObservableKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Which variant this handle refers to.
    pub fn kind(self) -> ObservableKind {
        self.kind
    }

    /// The variant-local index (the position within the scheduler's
    /// `InputPort`/`OutputPort`/`InternalSignal` storage).
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

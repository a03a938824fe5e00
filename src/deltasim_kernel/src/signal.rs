//! `InternalSignal<T>` storage.
//!
//! A testbench-only NBA variable: no DUT memory is involved, so unlike
//! [`crate::port::InputSlot`] there is no type-erased pointer shim, just a
//! canonical `u64` (`PortScalar::to_u64`/`from_u64` recover `T` at the typed
//! handle boundary, same as ports).

use crate::handle::ProcessId;

pub(crate) struct SignalSlot {
    pending: Option<u64>,
    current: u64,
    previous: u64,
    dirty: bool,
    dependents: Vec<ProcessId>,
}

impl SignalSlot {
    pub(crate) fn new(initial: u64) -> Self {
        Self {
            pending: None,
            current: initial,
            previous: initial,
            dirty: false,
            dependents: Vec::new(),
        }
    }

    pub(crate) fn stage(&mut self, value: u64) {
        self.pending = Some(value);
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn current(&self) -> u64 {
        self.current
    }

    pub(crate) fn previous(&self) -> u64 {
        self.previous
    }

    pub(crate) fn dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn dependents(&self) -> &[ProcessId] {
        &self.dependents
    }

    pub(crate) fn add_dependent(&mut self, id: ProcessId) {
        self.dependents.push(id);
    }

    /// COMMIT: promote a staged NBA write. Returns `true` iff the value
    /// changed, same contract as `InputSlot::commit`.
    pub(crate) fn commit(&mut self) -> bool {
        self.previous = self.current;
        self.dirty = false;
        let Some(value) = self.pending.take() else {
            return false;
        };
        self.current = value;
        self.dirty = value != self.previous;
        self.dirty
    }
}

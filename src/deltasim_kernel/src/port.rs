//! `InputPort<T>` / `OutputPort<T>` storage.
//!
//! Port memory lives in the DUT, addressed as `&'d Cell<T>` borrows. The
//! kernel erases `T` behind a `NonNull<()>` plus a pair of monomorphized
//! read/write shim function pointers, so COMMIT/SAMPLE can walk one
//! homogeneous `Vec<InputSlot>` / `Vec<OutputSlot>` instead of dispatching
//! through a `dyn` object per port.

use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use deltasim_core::PortScalar;

use crate::handle::ProcessId;

/// # Safety
/// `ptr` must point at a live `Cell<T>` for the duration of the call.
unsafe fn write_shim<T: PortScalar>(ptr: NonNull<()>, value: u64) {
    let cell = ptr.cast::<Cell<T>>().as_ref();
    cell.set(T::from_u64(value));
}

/// # Safety
/// `ptr` must point at a live `Cell<T>` for the duration of the call.
unsafe fn read_shim<T: PortScalar>(ptr: NonNull<()>) -> u64 {
    let cell = ptr.cast::<Cell<T>>().as_ref();
    cell.get().to_u64()
}

/// Testbench→DUT boundary storage.
///
/// `pending` holds a COMMIT-phase write staged by `ProcessCtx::write_input`;
/// it is flushed into the DUT's `Cell<T>` at the start of the next delta
/// cycle, collapsing same-delta multi-writes to the last one.
pub(crate) struct InputSlot<'d> {
    cell_ptr: NonNull<()>,
    write_fn: unsafe fn(NonNull<()>, u64),
    pending: Option<u64>,
    current: u64,
    previous: u64,
    dirty: bool,
    dependents: Vec<ProcessId>,
    _marker: PhantomData<&'d ()>,
}

impl<'d> InputSlot<'d> {
    pub(crate) fn new<T: PortScalar>(cell: &'d Cell<T>) -> Self {
        let current = cell.get().to_u64();
        Self {
            cell_ptr: NonNull::from(cell).cast(),
            write_fn: write_shim::<T>,
            pending: None,
            current,
            previous: current,
            dirty: false,
            dependents: Vec::new(),
            _marker: PhantomData,
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

    /// COMMIT: flush a staged write into the DUT's memory. Returns `true`
    /// iff the committed value differs from the prior delta's value (the
    /// `changed()` condition processes key off of).
    pub(crate) fn commit(&mut self) -> bool {
        self.previous = self.current;
        self.dirty = false;
        let Some(value) = self.pending.take() else {
            return false;
        };
        // SAFETY: `cell_ptr` was derived from a live `&'d Cell<T>` in `new`,
        // and `'d` outlives this slot (it is only ever stored inside a
        // `Scheduler<'d, D>` that does not outlive the borrow).
        unsafe { (self.write_fn)(self.cell_ptr, value) };
        self.current = value;
        self.dirty = value != self.previous;
        self.dirty
    }
}

/// DUT→Testbench boundary storage.
///
/// `current`/`previous` are only ever written by SAMPLE, directly from DUT
/// memory — never from testbench-staged values.
pub(crate) struct OutputSlot<'d> {
    cell_ptr: NonNull<()>,
    read_fn: unsafe fn(NonNull<()>) -> u64,
    current: u64,
    previous: u64,
    dirty: bool,
    dependents: Vec<ProcessId>,
    _marker: PhantomData<&'d ()>,
}

impl<'d> OutputSlot<'d> {
    pub(crate) fn new<T: PortScalar>(cell: &'d Cell<T>) -> Self {
        let current = cell.get().to_u64();
        Self {
            cell_ptr: NonNull::from(cell).cast(),
            read_fn: read_shim::<T>,
            current,
            previous: current,
            dirty: false,
            dependents: Vec::new(),
            _marker: PhantomData,
        }
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

    /// SAMPLE: read the DUT's memory and record whether it moved since the
    /// previous delta.
    pub(crate) fn sample(&mut self) -> bool {
        self.previous = self.current;
        // SAFETY: see `InputSlot::commit`.
        let value = unsafe { (self.read_fn)(self.cell_ptr) };
        self.current = value;
        self.dirty = value != self.previous;
        self.dirty
    }
}

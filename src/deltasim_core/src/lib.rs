//! Application-side API definition for `deltasim`.
//!
//! This crate defines the contracts a co-simulation scheduler kernel is
//! built against: the scalar value family ports are parameterized over
//! ([`value`]), the external-collaborator traits the kernel drives
//! ([`dut`], [`sink`]), and the error taxonomy reported back to the
//! testbench ([`error`]). The scheduler itself — ports, signals, the
//! process registry, and the delta-cycle kernel loop — lives in
//! `deltasim_kernel`.

pub mod dut;
pub mod error;
pub mod observable;
pub mod sink;
pub mod value;

pub use dut::Dut;
pub use error::{DirtyObservable, SchedulerError};
pub use observable::{ObservableId, ObservableKind};
pub use sink::WaveformSink;
pub use value::PortScalar;

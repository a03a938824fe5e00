//! The delta-cycle co-simulation scheduler: ports, signals, the process
//! registry, the timed-event queue, and the kernel loop itself.
//!
//! Built against [`deltasim_core`]'s `Dut`/`WaveformSink`/`PortScalar`
//! contracts. A typical testbench:
//!
//! ```ignore
//! let clk = Cell::new(false);
//! let mut scheduler = Scheduler::new();
//! let clk_in = scheduler.input(&clk);
//! scheduler.always(move |ctx| {
//!     let v = ctx.read_input(clk_in);
//!     ctx.write_input(clk_in, !v);
//!     ctx.schedule_after(5, move |_| {});
//! });
//! let outcome = scheduler.run(&mut dut, &mut sink, 1000)?;
//! ```

mod event_queue;
mod handle;
mod port;
mod process;
mod scheduler;
mod signal;

pub use handle::{AnyObservableId, InputPortId, OutputPortId, ProcessId, SignalId};
pub use process::ProcessCtx;
pub use scheduler::{PastTimePolicy, RunOutcome, Scheduler, DEFAULT_LOOP_BOUND};

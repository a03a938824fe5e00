//! Test doubles shared by the scenario tests under `tests/`.
//!
//! Keeps reusable DUT/sink scaffolding together with the `#[test]`s that use
//! it, since there is only one hosted environment here, not one per embedded
//! target.

pub mod doubles;

pub use doubles::{ClockedDut, CounterDut, HandshakeDut, LoopyDut, RecordingSink};

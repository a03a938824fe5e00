//! The scalar value family ports are parameterized over: a small
//! numeric-width family (bool, 8/16/32/64-bit unsigned) shared by
//! [`crate::dut::Dut`] port memory and by `deltasim_kernel`'s
//! `InputPort`/`OutputPort`/`InternalSignal`. Rather than a tagged-variant
//! sum type, ports stay monomorphic over `T: PortScalar`, and only the
//! process-sensitivity side erases to a small `dyn` object
//! ([`crate::observable::ObservableKind`]).

mod sealed {
    pub trait Sealed {}
}

/// A scalar type usable as a port/signal width.
///
/// Implemented for `bool`, `u8`, `u16`, `u32`, and `u64` only — this is a
/// sealed trait so the port-width family stays closed.
pub trait PortScalar: sealed::Sealed + Copy + Eq + Default + core::fmt::Debug + 'static {
    /// Interpret the value as a boolean for `posedge`/`negedge` purposes:
    /// nonzero is `true`, zero is `false`.
    fn is_nonzero(self) -> bool;

    /// Widen to the kernel's canonical storage representation.
    ///
    /// `deltasim_kernel` stores every port/signal slot as a `u64` regardless
    /// of `T` so COMMIT/SAMPLE/CONVERGE can walk homogeneous `Vec`s instead
    /// of dispatching through a `dyn` object per slot; `T` is recovered at
    /// the typed handle boundary via [`PortScalar::from_u64`].
    fn to_u64(self) -> u64;

    /// Narrow a canonical `u64` back to `Self`.
    ///
    /// Only ever called with a value this same `T` produced via
    /// [`PortScalar::to_u64`], so truncation never loses information.
    fn from_u64(v: u64) -> Self;
}

macro_rules! impl_port_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}
            impl PortScalar for $t {
                #[inline]
                fn is_nonzero(self) -> bool {
                    self != 0
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(v: u64) -> Self {
                    v as Self
                }
            }
        )*
    };
}

impl_port_scalar!(u8, u16, u32, u64);

impl sealed::Sealed for bool {}
impl PortScalar for bool {
    #[inline]
    fn is_nonzero(self) -> bool {
        self
    }

    #[inline]
    fn to_u64(self) -> u64 {
        self as u64
    }

    #[inline]
    fn from_u64(v: u64) -> Self {
        v != 0
    }
}

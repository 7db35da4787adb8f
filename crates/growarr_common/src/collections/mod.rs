mod imp;

mod growable_array;
mod reserve_hint;

use core::alloc::Layout;

use thiserror::Error;

use crate::mem::AllocError;

pub use growable_array::*;
pub use reserve_hint::*;

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:ident)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[inline]
            #[allow(clippy::partialeq_ne_impl)]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

/// Asserts `len <= capacity` in debug builds, or always with the `invariant_checks` feature.
macro_rules! check_invariants {
    ($arr:expr) => {
        if cfg!(any(debug_assertions, feature = "invariant_checks")) {
            let (len, cap) = ($arr.len(), $arr.capacity());
            assert!(len <= cap, "length (is {len}) exceeds capacity (is {cap})");
        }
    };
}
use check_invariants;

//--------------------------------------------------------------

/// Error returned when a container could not get the storage it needed.
///
/// The container is left exactly as it was before the failed operation.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum TryReserveError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The memory manager could not provide a buffer for the new capacity.
    #[error("memory allocation failed for {layout:?}")]
    AllocError {
        layout: Layout,
    },
}

impl From<AllocError> for TryReserveError {
    fn from(err: AllocError) -> Self {
        TryReserveError::AllocError { layout: err.layout }
    }
}

/// Error returned by checked element access when the index lies outside of the logical range.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("index {index} is out of range for an array of length {len}")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len:   usize,
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `None` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize>;
}

/// A reserve strategy that will try to either return double the current capacity, or the minimum required capacity, whichever is bigger.
///
/// Growing an empty container by a single element therefore results in a capacity of 1, then 2, 4, 8, ...
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        const MAX_CAP: usize = isize::MAX as usize;
        if min_capacity > MAX_CAP {
            return None;
        }

        // Doubling past the limit still leaves room for the minimum
        let double_cap = cur_capacity.saturating_mul(2);
        if double_cap > MAX_CAP {
            Some(min_capacity)
        } else {
            Some(double_cap.max(min_capacity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_or_min() {
        assert_eq!(DoubleOrMinReserveStrategy::calculate(0, 1), Some(1));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(1, 2), Some(2));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 5), Some(8));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 20), Some(20));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(0, isize::MAX as usize + 1), None);
    }

    #[test]
    fn double_or_min_falls_back_to_min_near_the_limit() {
        let max = isize::MAX as usize;
        assert_eq!(DoubleOrMinReserveStrategy::calculate(max / 2 + 1, max / 2 + 2), Some(max / 2 + 2));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(max, max), Some(max));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(max / 2, max / 2 + 1), Some(max - 1));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(max, max + 1), None);
    }

    #[test]
    fn error_messages() {
        let err = OutOfRangeError { index: 3, len: 3 };
        assert_eq!(err.to_string(), "index 3 is out of range for an array of length 3");
        assert_eq!(TryReserveError::CapacityOverflow.to_string(), "capacity overflow");
    }
}

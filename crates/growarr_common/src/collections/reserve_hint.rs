use super::GrowableArray;

/// A request for an empty container with room for at least `capacity` elements.
///
/// Created with [`reserve`] and consumed when converting it into a [`GrowableArray`].
///
/// ```
/// use growarr_common::collections::{reserve, GrowableArray};
///
/// let arr: GrowableArray<u32> = reserve(32).into();
/// assert!(arr.is_empty());
/// assert_eq!(arr.capacity(), 32);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReserveHint {
    capacity: usize,
}

impl ReserveHint {
    /// Get the requested capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Create a [`ReserveHint`] for `capacity` elements.
#[inline]
#[must_use]
pub const fn reserve(capacity: usize) -> ReserveHint {
    ReserveHint { capacity }
}

impl<T> From<ReserveHint> for GrowableArray<T> {
    fn from(hint: ReserveHint) -> Self {
        Self::with_reserve(hint)
    }
}

use std::{
    alloc::{self, Layout},
    marker::PhantomData,
    mem::{align_of, size_of},
    ptr::{self, NonNull},
};

use growarr_logging::{log_debug, log_error, LogCategory};

use crate::{
    collections::{ReserveStrategy, TryReserveError},
    mem,
};

const LOG_CAT: LogCategory = LogCategory::new_with_sub("Collections", "RawArray");

/// Low level utility for more ergonomically allocating, reallocating, and deallocating
/// a buffer of memory without having to worry about all the corner cases involved.
/// In particular:
///
/// - Uses a dangling pointer for zero-sized types and zero-length allocations.
/// - Avoids freeing the dangling pointer.
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Never leaves the buffer in a partially grown state: a new block is fully populated before the old one is released.
///
/// This type does not in any way inspect the memory it manages. When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawArray` to handle the actual things *stored* inside of `RawArray`.
///
/// Zero-sized types never allocate, but their capacity is still tracked, so growth behaves the same for every `T`.
pub(crate) struct RawArray<T, R: ReserveStrategy> {
    ptr:      NonNull<T>,
    cap:      usize,
    _phantom: PhantomData<(T, fn() -> R)>,
}

unsafe impl<T: Send, R: ReserveStrategy> Send for RawArray<T, R> {}
unsafe impl<T: Sync, R: ReserveStrategy> Sync for RawArray<T, R> {}

impl<T, R: ReserveStrategy> RawArray<T, R> {
    /// Creates an empty `RawArray` without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, _phantom: PhantomData }
    }

    /// Creates a `RawArray` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to create a `RawArray` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut arr = Self::new();
        if capacity != 0 {
            arr.finalize_grow(capacity, 0, None)?;
        }
        Ok(arr)
    }

    /// Get the capacity of the allocation.
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Get a raw pointer to the start of the allocation.
    /// Note that this is a dangling pointer when either `capacity() == 0` or `T` is zero-sized.
    pub const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
        if size_of::<T>() == 0 || self.cap == 0 {
            None
        } else {
            // The block was allocated with this exact layout, so it can't overflow
            debug_assert!(size_of::<T>() % align_of::<T>() == 0);
            unsafe {
                let layout = Layout::from_size_align_unchecked(size_of::<T>() * self.cap, align_of::<T>());
                Some((self.ptr.cast(), layout))
            }
        }
    }

    /// Returns if the buffer needs to grow to fulfill the needed extra capacity.
    pub fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.cap.wrapping_sub(len)
    }

    /// Ensures that the buffer contains at least enough space to hold `len + additional` elements.
    /// If it doesn't already have enough capacity, will reallocate following the reserve strategy to get amortized *O*(1) behavior.
    ///
    /// `len` may not exceed `self.capacity()`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve(&mut self, len: usize, additional: usize) {
        #[cold]
        fn do_reserve_and_handle<T, R: ReserveStrategy>(slf: &mut RawArray<T, R>, len: usize, additional: usize) {
            if let Err(err) = slf.grow_amortized(len, additional) {
                handle_error(err);
            }
        }

        if self.needs_to_grow(len, additional) {
            do_reserve_and_handle(self, len, additional);
        }
    }

    /// The same as `reserve`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_amortized(len, additional)?;
        }
        Ok(())
    }

    /// Ensures the capacity is at least `new_capacity`, reallocating to exactly `new_capacity` when it isn't.
    ///
    /// `len` is the number of initialized elements that need to be carried over.
    pub fn reserve_exact(&mut self, len: usize, new_capacity: usize) {
        if let Err(err) = self.try_reserve_exact(len, new_capacity) {
            handle_error(err);
        }
    }

    /// The same as `reserve_exact`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve_exact(&mut self, len: usize, new_capacity: usize) -> Result<(), TryReserveError> {
        if new_capacity > self.cap {
            self.finalize_grow(new_capacity, len, None)?;
        }
        Ok(())
    }

    /// Grows a full buffer by the reserve strategy, leaving an uninitialized slot at `index`.
    ///
    /// Elements `[0, index)` keep their position, elements `[index, len)` are moved one slot up.
    /// Each element is moved once.
    ///
    /// Requires `len == self.capacity()` and `index <= len`.
    pub fn try_grow_one_with_gap(&mut self, len: usize, index: usize) -> Result<(), TryReserveError> {
        debug_assert!(len == self.cap && index <= len);

        let required_cap = len.checked_add(1).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = self.calculate_capacity(required_cap)?;
        self.finalize_grow(new_cap, len, Some(index))
    }

    //--------------------------------------------------------------

    fn calculate_capacity(&self, required_cap: usize) -> Result<usize, TryReserveError> {
        match R::calculate(self.cap, required_cap) {
            Some(new_cap) => Ok(new_cap),
            None => {
                log_error!(LOG_CAT, "Capacity overflow growing from {} to at least {required_cap} elements", self.cap);
                Err(TryReserveError::CapacityOverflow)
            },
        }
    }

    fn grow_amortized(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(additional > 0);

        let required_cap = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = self.calculate_capacity(required_cap)?;
        self.finalize_grow(new_cap, len, None)
    }

    /// Moves the buffer into a new block of `new_cap` elements.
    ///
    /// On failure nothing is changed.
    fn finalize_grow(&mut self, new_cap: usize, len: usize, gap: Option<usize>) -> Result<(), TryReserveError> {
        debug_assert!(new_cap > self.cap && len <= self.cap);

        if size_of::<T>() == 0 {
            if new_cap > isize::MAX as usize {
                return Err(TryReserveError::CapacityOverflow);
            }
            self.cap = new_cap;
            return Ok(());
        }

        let layout = match Layout::array::<T>(new_cap) {
            Ok(layout) => layout,
            Err(_) => {
                log_error!(LOG_CAT, "Capacity overflow allocating {new_cap} elements of {} bytes", size_of::<T>());
                return Err(TryReserveError::CapacityOverflow);
            },
        };

        let new_ptr = match mem::allocate(layout) {
            Ok(ptr) => ptr.cast::<T>(),
            Err(err) => {
                log_error!(LOG_CAT, "Failed to grow from {} to {new_cap} elements: {err}", self.cap);
                return Err(err.into());
            },
        };

        unsafe {
            let src = self.ptr.as_ptr();
            let dst = new_ptr.as_ptr();
            match gap {
                None => ptr::copy_nonoverlapping(src, dst, len),
                Some(index) => {
                    ptr::copy_nonoverlapping(src, dst, index);
                    ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
                },
            }

            if let Some((old_ptr, old_layout)) = self.current_memory() {
                mem::deallocate(old_ptr, old_layout);
            }
        }

        log_debug!(LOG_CAT, "Grew from {} to {new_cap} elements ({} bytes)", self.cap, layout.size());
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T, R: ReserveStrategy> Drop for RawArray<T, R> {
    fn drop(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            unsafe { mem::deallocate(ptr, layout) };
        }
    }
}

/// Central function for reserve error handling
#[cold]
pub(crate) fn handle_error(e: TryReserveError) -> ! {
    match e {
        TryReserveError::CapacityOverflow => capacity_overflow(),
        TryReserveError::AllocError { layout } => alloc::handle_alloc_error(layout),
    }
}

fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::DoubleOrMinReserveStrategy;

    type Raw<T> = RawArray<T, DoubleOrMinReserveStrategy>;

    #[test]
    fn new_does_not_allocate() {
        let arr = Raw::<u32>::new();
        assert_eq!(arr.capacity(), 0);
        assert!(arr.current_memory().is_none());
    }

    #[test]
    fn amortized_growth_doubles() {
        let mut arr = Raw::<u32>::new();
        arr.reserve(0, 1);
        assert_eq!(arr.capacity(), 1);
        arr.reserve(1, 1);
        assert_eq!(arr.capacity(), 2);
        arr.reserve(2, 1);
        assert_eq!(arr.capacity(), 4);
        arr.reserve(3, 1);
        assert_eq!(arr.capacity(), 4);
        arr.reserve(4, 10);
        assert_eq!(arr.capacity(), 14);
    }

    #[test]
    fn exact_growth_never_shrinks() {
        let mut arr = Raw::<u64>::with_capacity(8);
        arr.reserve_exact(0, 3);
        assert_eq!(arr.capacity(), 8);
        arr.reserve_exact(0, 9);
        assert_eq!(arr.capacity(), 9);
    }

    #[test]
    fn grow_with_gap_moves_suffix() {
        let mut arr = Raw::<u32>::with_capacity(3);
        unsafe {
            for i in 0..3 {
                arr.ptr().add(i).write(i as u32 * 10);
            }
        }

        arr.try_grow_one_with_gap(3, 1).unwrap();
        assert_eq!(arr.capacity(), 6);
        unsafe {
            arr.ptr().add(1).write(5);
            let values = core::slice::from_raw_parts(arr.ptr(), 4);
            assert_eq!(values, &[0, 5, 10, 20]);
        }
    }

    #[test]
    fn zero_sized_capacity_is_tracked() {
        let mut arr = Raw::<()>::new();
        arr.reserve(0, 1);
        arr.reserve(1, 1);
        assert_eq!(arr.capacity(), 2);
        assert!(arr.current_memory().is_none());
    }

    #[test]
    fn zero_sized_growth_near_the_limit_uses_the_minimum() {
        let max = isize::MAX as usize;
        let mut arr = Raw::<()>::new();
        arr.reserve_exact(0, max / 2 + 1);

        let len = arr.capacity();
        assert_eq!(arr.try_reserve(len, 1), Ok(()));
        assert_eq!(arr.capacity(), max / 2 + 2);

        arr.reserve_exact(0, max);
        assert_eq!(arr.try_reserve(max, 1), Err(TryReserveError::CapacityOverflow));
        assert_eq!(arr.capacity(), max);
    }

    #[test]
    fn overflow_is_reported() {
        let mut arr = Raw::<u64>::new();
        assert_eq!(arr.try_reserve_exact(0, usize::MAX / 4), Err(TryReserveError::CapacityOverflow));
        assert_eq!(arr.try_reserve(0, usize::MAX), Err(TryReserveError::CapacityOverflow));
        assert_eq!(arr.capacity(), 0);
    }
}

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter,
    mem::{self, ManuallyDrop},
    ops::{self, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

use static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any};

use super::{
    check_invariants,
    imp::{handle_error, RawArray},
    impl_slice_partial_eq_generic,
    DoubleOrMinReserveStrategy,
    OutOfRangeError,
    ReserveHint,
    ReserveStrategy,
    TryReserveError,
};

mod into_iter;

pub use into_iter::IntoIter;


/// A contiguous growable array type with explicit control over its capacity.
///
/// Growable arrays have *O*(1) indexing, amortized *O*(1) push (to the end), and *O*(1) pop (from the back).
///
/// # Examples
///
/// ```
/// use growarr_common::{collections::GrowableArray, growarr};
///
/// let mut arr = GrowableArray::new();
/// arr.push(1);
/// arr.push(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
/// ```
///
/// The [`growarr!`](crate::growarr) macro is provided for convenient initialization:
///
/// ```
/// use growarr_common::growarr;
///
/// let mut arr1 = growarr![1, 2, 3];
/// arr1.push(4);
/// let arr2 = growarr![1, 2, 3, 4];
/// assert_eq!(arr1, arr2);
///
/// let zeros = growarr![0; 5];
/// assert_eq!(zeros, [0, 0, 0, 0, 0]);
/// ```
///
/// # Indexing
///
/// `arr[i]` is the fast path and expects `i < len()`, indexing outside of the array panics.
/// Use [`at`](GrowableArray::at) to get an [`OutOfRangeError`] instead, or the slice's `get_unchecked` when the index is known to be valid.
///
/// # Capacity and reallocation
///
/// The capacity of a growable array is the amount of space allocated for any future elements that will be added onto it.
/// This is not to be confused with the *length*, which specifies the number of actual elements within the array.
/// Slots past the length are left uninitialized.
///
/// When an element is appended to a full array, the capacity grows following the reserve strategy `R`.
/// With the default [`DoubleOrMinReserveStrategy`] an empty array grows to 1 and a full array doubles.
/// [`reserve`](GrowableArray::reserve) grows to exactly the requested capacity and never shrinks.
///
/// Growing allocates a new buffer, moves the elements over and only then releases the old buffer.
/// When allocation fails, the `try_*` variants return a [`TryReserveError`] and leave the array untouched.
pub struct GrowableArray<T, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    buf: RawArray<T, R>,
    len: usize,
}

assert_eq_size!(GrowableArray<u8>, [usize; 3]);
assert_eq_size!(GrowableArray<u8>, Option<GrowableArray<u8>>);
assert_impl_all!(GrowableArray<u32>: Send, Sync, Clone, Default);
assert_not_impl_any!(GrowableArray<std::rc::Rc<u32>>: Send, Sync);

impl<T> GrowableArray<T> {
    /// Constructs a new, empty `GrowableArray<T>`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: RawArray::new(), len: 0 }
    }

    /// Constructs a new, empty `GrowableArray<T>` with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: RawArray::with_capacity(capacity), len: 0 }
    }

    /// Tries to construct a new, empty `GrowableArray<T>` with exactly `capacity` slots.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self { buf: RawArray::try_with_capacity(capacity)?, len: 0 })
    }

    /// Constructs an array of `len` default values, with a capacity of exactly `len`.
    ///
    /// ```
    /// use growarr_common::collections::GrowableArray;
    ///
    /// let arr = GrowableArray::<u32>::with_len(3);
    /// assert_eq!(arr, [0, 0, 0]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn with_len(len: usize) -> Self where
        T: Default
    {
        let mut arr = Self::with_capacity(len);
        arr.extend_trusted(iter::repeat_with(T::default).take(len));
        arr
    }

    /// Constructs an array of `n` clones of `elem`, with a capacity of exactly `n`.
    pub fn from_elem(elem: T, n: usize) -> Self where
        T: Clone
    {
        let mut arr = Self::with_capacity(n);
        if n != 0 {
            arr.extend_trusted(iter::repeat(elem).take(n));
        }
        arr
    }

    /// Constructs an empty array with the capacity carried by `hint`.
    ///
    /// ```
    /// use growarr_common::collections::{reserve, GrowableArray};
    ///
    /// let arr = GrowableArray::<String>::with_reserve(reserve(10));
    /// assert!(arr.is_empty());
    /// assert_eq!(arr.capacity(), 10);
    /// ```
    #[inline]
    pub fn with_reserve(hint: ReserveHint) -> Self {
        Self::with_capacity(hint.capacity())
    }
}

impl<T, R: ReserveStrategy> GrowableArray<T, R> {
    /// Returns the number of elements in the array, also referred to as the 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the total number of elements the array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forces the length of the array to `new_len`.
    ///
    /// # Safety
    ///
    /// - `new_len` must be less than or equal to [`capacity()`](GrowableArray::capacity).
    /// - The elements at `old_len..new_len` must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    /// Returns a raw pointer to the array's buffer, or a dangling pointer valid for zero sized reads if the array didn't allocate.
    ///
    /// Modifying the array may cause its buffer to be reallocated, which would also make any pointer to it invalid.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns an unsafe mutable pointer to the array's buffer, or a dangling pointer valid for zero sized reads if the array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Extracts a slice containing the entire array.
    ///
    /// Equivalent to `&s[..]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Extracts a mutable slice of the entire array.
    ///
    /// Equivalent to `&mut s[..]`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a reference to the element at `index`, or an [`OutOfRangeError`] if `index >= len()`.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let arr = growarr![1, 2, 3];
    /// assert_eq!(arr.at(2), Ok(&3));
    /// assert!(arr.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRangeError> {
        let len = self.len;
        self.get(index).ok_or(OutOfRangeError { index, len })
    }

    /// Returns a mutable reference to the element at `index`, or an [`OutOfRangeError`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRangeError> {
        let len = self.len;
        self.get_mut(index).ok_or(OutOfRangeError { index, len })
    }

    /// Moves the contents out of `self`, leaving it empty without any capacity.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let mut a = growarr![1, 2, 3];
    /// let b = a.take();
    /// assert_eq!(b, [1, 2, 3]);
    /// assert_eq!((a.len(), a.capacity()), (0, 0));
    /// ```
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Exchanges the contents of `self` and `other` without moving any element.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Clears the array, removing all values.
    ///
    /// This has no effect on the allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();

        // SAFETY
        // - `elems` comes directly from `as_mut_slice` and is therefore valid.
        // - Setting `self.len` before calling `drop_in_place` means that if an element's `Drop` impl panics,
        //   the array's `Drop` impl will do nothing (leaking the rest of the elements) instead of dropping some twice.
        unsafe {
            self.len = 0;
            ptr::drop_in_place(elems);
        }
    }

    /// Shortens the array, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater or equal to the array's current length, this has no effect.
    pub fn truncate(&mut self, len: usize) {
        // Safety:
        // - The slice passed to `drop_in_place` is valid; the `len >= self.len` case avoids creating an invalid slice, and
        // - The `len` of the array is shrunk before calling `drop_in_place` such that no value will be dropped twice.
        unsafe {
            if len >= self.len {
                return;
            }
            let remaining_len = self.len - len;
            let s = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), remaining_len);
            self.len = len;
            ptr::drop_in_place(s);
        }
    }

    /// Ensures the array can hold at least `new_capacity` elements.
    ///
    /// Unlike `Vec::reserve`, `new_capacity` is the total target capacity, not an additional amount.
    /// If it exceeds the current capacity, the buffer is reallocated to exactly `new_capacity`, otherwise nothing happens.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    ///
    /// ```
    /// use growarr_common::collections::GrowableArray;
    ///
    /// let mut arr = GrowableArray::<u8>::new();
    /// arr.reserve(10);
    /// arr.reserve(4);
    /// assert_eq!(arr.capacity(), 10);
    /// ```
    pub fn reserve(&mut self, new_capacity: usize) {
        self.buf.reserve_exact(self.len, new_capacity);
        check_invariants!(self);
    }

    /// Tries to ensure the array can hold at least `new_capacity` elements.
    ///
    /// On error the array is left unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        self.buf.try_reserve_exact(self.len, new_capacity)?;
        check_invariants!(self);
        Ok(())
    }

    /// Appends an element to the back of the array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time.
    #[inline]
    pub fn push(&mut self, value: T) {
        let len = self.len;
        if len == self.buf.capacity() {
            self.buf.reserve(len, 1);
        }
        unsafe {
            ptr::write(self.as_mut_ptr().add(len), value);
        }
        self.len = len + 1;
        check_invariants!(self);
    }

    /// Appends an element to the back of the array, returning an error if the array needed to grow and couldn't.
    ///
    /// On error `value` is dropped and the array is left unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
        let len = self.len;
        if len == self.buf.capacity() {
            self.buf.try_reserve(len, 1)?;
        }
        unsafe {
            ptr::write(self.as_mut_ptr().add(len), value);
        }
        self.len = len + 1;
        check_invariants!(self);
        Ok(())
    }

    /// Appends an element if there is sufficient spare capacity, otherwise the element is returned.
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.len == self.buf.capacity() {
            return Err(value);
        }
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes the last element from the array and returns it, or [`None`] if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            unsafe {
                self.len -= 1;
                Some(ptr::read(self.as_ptr().add(self.len)))
            }
        }
    }

    /// Drops the last element of the array.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        #[cold]
        #[track_caller]
        fn assert_failed() -> ! {
            panic!("pop_back called on an empty array");
        }

        match self.len {
            0 => assert_failed(),
            len => self.truncate(len - 1),
        }
    }

    /// Inserts an element at position `index`, shifting all elements after it to the right.
    /// Returns the index of the inserted element.
    ///
    /// When the array is full, the elements are moved into the new buffer around the inserted element, so each is only moved once.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds `isize::MAX` _bytes_.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let mut arr = growarr![1, 2, 3];
    /// assert_eq!(arr.insert(1, 4), 1);
    /// assert_eq!(arr, [1, 4, 2, 3]);
    /// arr.insert(4, 5);
    /// assert_eq!(arr, [1, 4, 2, 3, 5]);
    /// ```
    ///
    /// # Time complexity
    ///
    /// Takes *O*([`GrowableArray::len`]) time.
    #[track_caller]
    pub fn insert(&mut self, index: usize, element: T) -> usize {
        match self.try_insert(index, element) {
            Ok(index) => index,
            Err(err) => handle_error(err),
        }
    }

    /// Inserts an element at position `index`, returning an error if the array needed to grow and couldn't.
    ///
    /// On error `element` is dropped and the array is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_insert(&mut self, index: usize, element: T) -> Result<usize, TryReserveError> {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }

        unsafe {
            if len == self.buf.capacity() {
                // The new buffer already has the hole at `index`
                self.buf.try_grow_one_with_gap(len, index)?;
                ptr::write(self.as_mut_ptr().add(index), element);
            } else {
                let p = self.as_mut_ptr().add(index);
                if index < len {
                    ptr::copy(p, p.add(1), len - index);
                }
                ptr::write(p, element);
            }
        }
        self.len = len + 1;
        check_invariants!(self);
        Ok(index)
    }

    /// Removes and returns the element at position `index`, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        if index >= self.len {
            assert_failed(index, self.len);
        }
        unsafe { self.remove_unchecked(index) }
    }

    /// Drops the element at position `index`, shifting all elements after it to the left.
    ///
    /// Returns `index`, which now refers to the element that followed the erased one, or equals `len()` if the last element was erased.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let mut arr = growarr![1, 2, 3];
    /// let next = arr.erase(1);
    /// assert_eq!(arr, [1, 3]);
    /// assert_eq!(arr[next], 3);
    /// ```
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("erase index (is {index}) should be < len (is {len})");
        }

        if index >= self.len {
            assert_failed(index, self.len);
        }
        drop(unsafe { self.remove_unchecked(index) });
        check_invariants!(self);
        index
    }

    /// Requires `index < self.len`.
    unsafe fn remove_unchecked(&mut self, index: usize) -> T {
        let len = self.len;
        let p = self.as_mut_ptr().add(index);
        let value = ptr::read(p);
        ptr::copy(p.add(1), p, len - index - 1);
        self.len = len - 1;
        value
    }

    /// Resizes the array in-place so that `len` is equal to `new_len`, filling new slots with the result of calling `f`.
    ///
    /// Growing past the capacity reallocates to the larger of double the capacity and `new_len`.
    /// Shrinking drops the elements past `new_len` and keeps the capacity.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        if let Err(err) = self.try_resize_with(new_len, f) {
            handle_error(err);
        }
    }

    /// The same as `resize_with`, but returns on errors instead of panicking or aborting.
    ///
    /// On error the array is left unchanged.
    pub fn try_resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) -> Result<(), TryReserveError> {
        let len = self.len;
        if new_len > len {
            self.buf.try_reserve(len, new_len - len)?;
            self.extend_trusted(iter::repeat_with(f).take(new_len - len));
        } else {
            self.truncate(new_len);
        }
        check_invariants!(self);
        Ok(())
    }

    /// Appends the items of an iterator that yields no more items than the spare capacity.
    ///
    /// The length is kept up to date when an item panics, so the array never exposes uninitialized slots.
    fn extend_trusted<I: Iterator<Item = T>>(&mut self, iter: I) {
        let ptr = self.buf.ptr();
        let cap = self.buf.capacity();
        let mut len = scopeguard::guard(self.len, |len| self.len = len);
        for item in iter {
            debug_assert!(*len < cap);
            unsafe { ptr::write(ptr.add(*len), item) };
            *len += 1;
        }
    }
}

impl<T: Default, R: ReserveStrategy> GrowableArray<T, R> {
    /// Resizes the array in-place so that `len` is equal to `new_len`, filling new slots with `T::default()`.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let mut arr = growarr![1, 2];
    /// arr.resize(4);
    /// assert_eq!(arr, [1, 2, 0, 0]);
    /// arr.resize(1);
    /// assert_eq!(arr, [1]);
    /// assert_eq!(arr.capacity(), 4);
    /// ```
    pub fn resize(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default);
    }

    /// The same as `resize`, but returns on errors instead of panicking or aborting.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), TryReserveError> {
        self.try_resize_with(new_len, T::default)
    }
}

impl<T: Clone, R: ReserveStrategy> GrowableArray<T, R> {
    /// Clones and appends all elements in a slice to the array.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.buf.reserve(self.len, other.len());
        self.extend_trusted(other.iter().cloned());
        check_invariants!(self);
    }
}

impl<T, R: ReserveStrategy> ops::Deref for GrowableArray<T, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }
}

impl<T, R: ReserveStrategy> ops::DerefMut for GrowableArray<T, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }
}

impl<T: Clone, R: ReserveStrategy> Clone for GrowableArray<T, R> {
    /// Clones the elements into a new buffer with the same capacity as `self`.
    fn clone(&self) -> Self {
        let mut arr = Self { buf: RawArray::with_capacity(self.capacity()), len: 0 };
        arr.extend_trusted(self.iter().cloned());
        arr
    }

    /// Overwrites the contents of `self` with a clone of the contents of `source`.
    ///
    /// The existing buffer is reused when it is large enough.
    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);

        let (init, tail) = source.split_at(self.len);
        self.clone_from_slice(init);
        self.extend_from_slice(tail);
    }
}

impl<T: Hash, R: ReserveStrategy> Hash for GrowableArray<T, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> Index<I> for GrowableArray<T, R> {
    type Output = I::Output;

    #[track_caller]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> IndexMut<I> for GrowableArray<T, R> {
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, R: ReserveStrategy> FromIterator<T> for GrowableArray<T, R> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::default();
        arr.extend(iter);
        arr
    }
}

impl<T, R: ReserveStrategy> IntoIterator for GrowableArray<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T, R>;

    /// Creates a consuming iterator, that is, one that moves each value out of the array (from start to end).
    fn into_iter(self) -> Self::IntoIter {
        let me = ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so the buffer is now owned by the iterator alone
        let buf = unsafe { ptr::read(&me.buf) };
        IntoIter::new(buf, me.len)
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a GrowableArray<T, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a mut GrowableArray<T, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, R: ReserveStrategy> Extend<T> for GrowableArray<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter();
        while let Some(elem) = iter.next() {
            let len = self.len;
            if len == self.buf.capacity() {
                let (lower, _) = iter.size_hint();
                self.buf.reserve(len, lower.saturating_add(1));
            }
            unsafe {
                ptr::write(self.as_mut_ptr().add(len), elem);
            }
            self.len = len + 1;
        }
        check_invariants!(self);
    }
}

impl<'a, T: Copy + 'a, R: ReserveStrategy> Extend<&'a T> for GrowableArray<T, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl_slice_partial_eq_generic!([R0: ReserveStrategy, R1: ReserveStrategy] GrowableArray<T, R0>, GrowableArray<U, R1>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] GrowableArray<T, R>, &[U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] GrowableArray<T, R>, &mut [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] &[T], GrowableArray<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] &mut [T], GrowableArray<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] GrowableArray<T, R>, [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] [T], GrowableArray<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] GrowableArray<T, R>, [U; N]);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] [T; N], GrowableArray<U, R>);

/// Lexicographic ordering built on the element's `<`.
///
/// The derived relations are defined on top of `<` and `==`:
/// `a <= b` is `a < b || a == b`, `a > b` is `!(a <= b)` and `a >= b` is `!(a < b)`.
/// For elements with a total order this matches `partial_cmp`.
impl<T, R0, R1> PartialOrd<GrowableArray<T, R1>> for GrowableArray<T, R0> where
    T: PartialOrd,
    R0: ReserveStrategy,
    R1: ReserveStrategy,
{
    #[inline]
    fn partial_cmp(&self, other: &GrowableArray<T, R1>) -> Option<Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }

    fn lt(&self, other: &GrowableArray<T, R1>) -> bool {
        lexicographic_less(&self[..], &other[..])
    }

    fn le(&self, other: &GrowableArray<T, R1>) -> bool {
        self.lt(other) || self[..] == other[..]
    }

    fn gt(&self, other: &GrowableArray<T, R1>) -> bool {
        !self.le(other)
    }

    fn ge(&self, other: &GrowableArray<T, R1>) -> bool {
        !self.lt(other)
    }
}

fn lexicographic_less<T: PartialOrd>(lhs: &[T], rhs: &[T]) -> bool {
    for (l, r) in lhs.iter().zip(rhs) {
        if l < r {
            return true;
        }
        if r < l {
            return false;
        }
    }
    lhs.len() < rhs.len()
}

impl<T: Eq, R: ReserveStrategy> Eq for GrowableArray<T, R> {}

impl<T: Ord, R: ReserveStrategy> Ord for GrowableArray<T, R> {
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T, R: ReserveStrategy> Drop for GrowableArray<T, R> {
    fn drop(&mut self) {
        unsafe {
            // Drop the initialized prefix as a raw slice
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len))
        }
        // RawArray handles deallocation
    }
}

impl<T, R: ReserveStrategy> Default for GrowableArray<T, R> {
    /// Creates an empty `GrowableArray<T>`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    fn default() -> Self {
        Self { buf: RawArray::new(), len: 0 }
    }
}

impl<T: fmt::Debug, R: ReserveStrategy> fmt::Debug for GrowableArray<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, R: ReserveStrategy> AsRef<[T]> for GrowableArray<T, R> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, R: ReserveStrategy> AsMut<[T]> for GrowableArray<T, R> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone> From<&[T]> for GrowableArray<T> {
    /// Allocate a `GrowableArray<T>` with exactly `value.len()` slots and fill it by cloning `value`'s items.
    fn from(value: &[T]) -> Self {
        let mut arr = Self::with_capacity(value.len());
        arr.extend_trusted(value.iter().cloned());
        arr
    }
}

impl<T, const N: usize> From<[T; N]> for GrowableArray<T> {
    /// Allocate a `GrowableArray<T>` with exactly `N` slots and move the items of `value` into it.
    ///
    /// ```
    /// use growarr_common::{collections::GrowableArray, growarr};
    ///
    /// assert_eq!(GrowableArray::from([1, 2, 3]), growarr![1, 2, 3]);
    /// ```
    fn from(value: [T; N]) -> Self {
        let mut arr = Self::with_capacity(N);
        unsafe {
            let value = ManuallyDrop::new(value);
            ptr::copy_nonoverlapping(value.as_ptr(), arr.as_mut_ptr(), N);
            arr.set_len(N);
        }
        arr
    }
}

/// Creates a [`GrowableArray`] containing the arguments.
///
/// - `growarr![]` creates an empty array without allocating.
/// - `growarr![a, b, c]` creates an array holding the given elements, with a capacity of exactly the element count.
/// - `growarr![elem; n]` creates an array of `n` clones of `elem`, with a capacity of exactly `n`.
///
/// ```
/// use growarr_common::growarr;
///
/// let arr = growarr![1, 2, 3];
/// assert_eq!(arr.capacity(), 3);
/// assert_eq!(growarr!["a"; 2], ["a", "a"]);
/// ```
#[macro_export]
macro_rules! growarr {
    () => {
        $crate::collections::GrowableArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::GrowableArray::from_elem($elem, $n)
    };
    ($($val:expr),+ $(,)?) => {
        {
            let mut arr = $crate::collections::GrowableArray::with_capacity($crate::count_exprs!($($val),+));
            $(
                arr.push($val);
            )+
            arr
        }
    };
}

use core::{fmt, iter::FusedIterator, ptr, slice};

use crate::collections::{imp::RawArray, ReserveStrategy};

/// An iterator that moves out of a [`GrowableArray`](super::GrowableArray).
///
/// Created by the `into_iter` method on `GrowableArray` (provided by the [`IntoIterator`] trait).
/// Items that were not yielded are dropped together with the iterator, after which the buffer is released.
pub struct IntoIter<T, R: ReserveStrategy> {
    buf:   RawArray<T, R>,
    /// Index of the next item yielded from the front
    start: usize,
    /// One past the index of the next item yielded from the back
    end:   usize,
}

impl<T, R: ReserveStrategy> IntoIter<T, R> {
    /// `buf` must hold `len` initialized items.
    pub(super) fn new(buf: RawArray<T, R>, len: usize) -> Self {
        Self { buf, start: 0, end: len }
    }

    /// Returns the remaining items of this iterator as a slice.
    ///
    /// ```
    /// use growarr_common::growarr;
    ///
    /// let arr = growarr!['a', 'b', 'c'];
    /// let mut into_iter = arr.into_iter();
    /// assert_eq!(into_iter.as_slice(), &['a', 'b', 'c']);
    /// let _ = into_iter.next();
    /// assert_eq!(into_iter.as_slice(), &['b', 'c']);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T: fmt::Debug, R: ReserveStrategy> fmt::Debug for IntoIter<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, R: ReserveStrategy> AsRef<[T]> for IntoIter<T, R> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, R: ReserveStrategy> Iterator for IntoIter<T, R> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        Some(unsafe { ptr::read(self.buf.ptr().add(index)) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.end - self.start;
        (exact, Some(exact))
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }
}

impl<T, R: ReserveStrategy> DoubleEndedIterator for IntoIter<T, R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(unsafe { ptr::read(self.buf.ptr().add(self.end)) })
    }
}

impl<T, R: ReserveStrategy> ExactSizeIterator for IntoIter<T, R> {}

impl<T, R: ReserveStrategy> FusedIterator for IntoIter<T, R> {}

impl<T, R: ReserveStrategy> Drop for IntoIter<T, R> {
    fn drop(&mut self) {
        let remaining: *mut [T] = self.as_mut_slice();
        // Forget the items first, so a panicking drop can't drop them twice
        self.start = self.end;
        unsafe { ptr::drop_in_place(remaining) };
        // RawArray handles deallocation
    }
}

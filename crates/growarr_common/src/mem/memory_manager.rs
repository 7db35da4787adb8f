use std::{
    alloc::{self, Layout},
    ptr::NonNull,
};

use thiserror::Error;

/// The memory manager could not provide a block for the requested layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("failed to allocate {} bytes (align {})", .layout.size(), .layout.align())]
pub struct AllocError {
    pub layout: Layout,
}

/// Allocation statistics of the current thread.
///
/// Only collected when the `memory_tracking` feature is enabled, otherwise every field reads as 0.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct MemoryStats {
    /// Number of blocks currently allocated
    pub live_allocations:   usize,
    /// Number of bytes currently allocated
    pub live_bytes:         usize,
    /// Highest value `live_bytes` has reached
    pub peak_bytes:         usize,
    /// Number of successful allocations over the lifetime of the thread
    pub total_allocations:  usize,
    /// Number of allocations that were refused
    pub failed_allocations: usize,
}

impl MemoryStats {
    const ZERO: Self = Self {
        live_allocations: 0,
        live_bytes: 0,
        peak_bytes: 0,
        total_allocations: 0,
        failed_allocations: 0,
    };
}

cfg_if::cfg_if! {
    if #[cfg(feature = "memory_tracking")] {
        use std::cell::Cell;

        thread_local! {
            static STATS: Cell<MemoryStats> = const { Cell::new(MemoryStats::ZERO) };
            static LIMIT: Cell<Option<usize>> = const { Cell::new(None) };
        }

        /// Get the allocation statistics of the current thread.
        pub fn thread_memory_stats() -> MemoryStats {
            STATS.with(Cell::get)
        }

        /// Limit the number of live bytes the current thread may hold, `None` removes the limit.
        ///
        /// Any allocation that would take the thread over the limit fails with an [`AllocError`].
        /// Memory that is already allocated is not affected.
        pub fn set_thread_allocation_limit(limit: Option<usize>) {
            LIMIT.with(|cell| cell.set(limit));
        }

        fn may_allocate(size: usize) -> bool {
            let live = STATS.with(|stats| stats.get().live_bytes);
            LIMIT.with(|limit| match limit.get() {
                Some(limit) => live.checked_add(size).map_or(false, |total| total <= limit),
                None => true,
            })
        }

        fn update_stats(f: impl FnOnce(&mut MemoryStats)) {
            STATS.with(|cell| {
                let mut stats = cell.get();
                f(&mut stats);
                cell.set(stats);
            });
        }

        fn track_alloc(size: usize) {
            update_stats(|stats| {
                stats.live_allocations += 1;
                stats.total_allocations += 1;
                stats.live_bytes += size;
                stats.peak_bytes = stats.peak_bytes.max(stats.live_bytes);
            });
        }

        fn track_failed_alloc() {
            update_stats(|stats| stats.failed_allocations += 1);
        }

        fn track_dealloc(size: usize) {
            update_stats(|stats| {
                // Blocks may be released on a different thread than they were allocated on
                stats.live_allocations = stats.live_allocations.saturating_sub(1);
                stats.live_bytes = stats.live_bytes.saturating_sub(size);
            });
        }
    } else {
        /// Get the allocation statistics of the current thread.
        pub fn thread_memory_stats() -> MemoryStats {
            MemoryStats::ZERO
        }

        /// Without `memory_tracking` no live byte count exists, so limits are ignored.
        pub fn set_thread_allocation_limit(_limit: Option<usize>) {}

        fn may_allocate(_size: usize) -> bool {
            true
        }

        fn track_alloc(_size: usize) {}
        fn track_failed_alloc() {}
        fn track_dealloc(_size: usize) {}
    }
}

/// Allocate an uninitialized block of memory for `layout`.
///
/// # Panics
///
/// Panics if `layout` has a size of 0, zero-sized blocks never need to be allocated.
pub fn allocate(layout: Layout) -> Result<NonNull<u8>, AllocError> {
    assert!(layout.size() != 0, "Cannot allocate a zero-sized block");

    if !may_allocate(layout.size()) {
        track_failed_alloc();
        return Err(AllocError { layout });
    }

    // SAFETY: `layout` has a non-zero size
    let ptr = unsafe { alloc::alloc(layout) };
    match NonNull::new(ptr) {
        Some(ptr) => {
            track_alloc(layout.size());
            Ok(ptr)
        },
        None => {
            track_failed_alloc();
            Err(AllocError { layout })
        },
    }
}

/// Release a block of memory.
///
/// # Safety
///
/// - `ptr` must have been returned by [`allocate`].
/// - `layout` must be the layout `ptr` was allocated with.
/// - `ptr` may not be used after this call.
pub unsafe fn deallocate(ptr: NonNull<u8>, layout: Layout) {
    alloc::dealloc(ptr.as_ptr(), layout);
    track_dealloc(layout.size());
}

//! Contiguous, growable storage and the memory plumbing underneath it.
//!
//! The main type is [`GrowableArray`](collections::GrowableArray), a dynamic array with explicit control over its capacity.

pub mod mem;
pub mod collections;

pub mod prelude;

#[doc(hidden)]
pub use growarr_base::count_exprs;

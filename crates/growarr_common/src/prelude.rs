pub use crate::collections::{GrowableArray, ReserveHint, reserve};
pub use crate::growarr;

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors returned by the fallible capacity operations.
///
/// The infallible paths (`with_capacity`, the insert family, `reserve`) treat
/// both conditions as fatal instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The index type cannot address the requested number of slots
    #[error("index space exhausted: {requested} slots requested, index type addresses {max}")]
    IndexSpaceExhausted {
        /// Slots needed, anchor included
        requested: usize,
        /// Slots the index type can address
        max: usize,
    },
    /// The allocator refused to grow the arena
    #[error("arena allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

//! Error types for the hybrid sort.

use thiserror::Error;

/// Errors reported by [`HybridSorter`](crate::HybridSorter).
///
/// Range errors are detected before the sequence is touched. Scratch errors can surface halfway
/// through a sort, in which case the range still holds a permutation of its input but is only
/// partially ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// The inclusive range `[p, r]` is empty or reversed.
    #[error("invalid range: lower index {p} is greater than upper index {r}")]
    InvalidRange { p: usize, r: usize },

    /// The upper index does not address an element of the sequence.
    #[error("index {r} out of bounds for sequence of length {len}")]
    OutOfBounds { r: usize, len: usize },

    /// The scratch buffer for a merge could not be allocated.
    #[error("out of memory: failed to allocate scratch buffer of {requested} elements")]
    OutOfMemory { requested: usize },

    /// A pre-allocated scratch buffer is smaller than a merge requires.
    #[error("scratch buffer too small: merge needs {requested} elements, {available} available")]
    ScratchTooSmall { requested: usize, available: usize },
}

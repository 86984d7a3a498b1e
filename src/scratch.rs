//! Scratch buffers for the merge step.
//!
//! The merge copies the left partition aside before interleaving it with the right one. Where that
//! copy lives is decided by a [`ScratchProvider`], which the sorter receives as a capability
//! rather than reaching for shared state, so concurrent sorts never contend for a buffer.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::error;

use crate::SortError;

/// Supplies scratch space to the merge step.
pub trait ScratchProvider {
    /// Returns a buffer of exactly `len` elements. The contents are unspecified and the buffer is
    /// only valid until the next call.
    fn scratch(&mut self, len: usize) -> Result<&mut [u32], SortError>;

    /// Number of heap allocations performed so far. Expected to never decrease.
    fn allocations(&self) -> usize;
}

/// Allocates `len` elements, reporting failure instead of aborting.
pub(crate) fn try_alloc(len: usize) -> Result<Vec<u32>, SortError> {
    let mut buf = Vec::new();
    if buf.try_reserve_exact(len).is_err() {
        error!(requested = len, "scratch allocation failed");
        return Err(SortError::OutOfMemory { requested: len });
    }
    // Capacity is already there, this does not reallocate.
    buf.resize(len, 0);
    Ok(buf)
}

/// One buffer for a whole sort invocation, allocated before recursion starts.
///
/// Sized to the top-level left partition, which is the largest left partition any merge of that
/// invocation will copy. Can also be built once with [`PerSortScratch::with_len`] and reused
/// across many sorts.
#[derive(Debug, Default)]
pub struct PerSortScratch {
    buf: Vec<u32>,
    allocations: usize,
}

impl PerSortScratch {
    pub fn with_len(len: usize) -> Result<Self, SortError> {
        Ok(Self {
            buf: try_alloc(len)?,
            allocations: 1,
        })
    }

    /// Buffer large enough for sorting `len` contiguous elements.
    pub fn for_sort_len(len: usize) -> Result<Self, SortError> {
        Self::with_len(left_len(len))
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl ScratchProvider for PerSortScratch {
    fn scratch(&mut self, len: usize) -> Result<&mut [u32], SortError> {
        let available = self.buf.len();
        self.buf
            .get_mut(..len)
            .ok_or(SortError::ScratchTooSmall {
                requested: len,
                available,
            })
    }

    fn allocations(&self) -> usize {
        self.allocations
    }
}

/// A fresh buffer for every merge, sized exactly to that merge's left partition.
#[derive(Debug, Default)]
pub struct PerMergeScratch {
    current: Vec<u32>,
    allocations: usize,
}

impl PerMergeScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScratchProvider for PerMergeScratch {
    fn scratch(&mut self, len: usize) -> Result<&mut [u32], SortError> {
        // The previous merge's buffer is released here.
        self.current = try_alloc(len)?;
        self.allocations += 1;
        Ok(self.current.as_mut_slice())
    }

    fn allocations(&self) -> usize {
        self.allocations
    }
}

/// Length of the left partition when splitting `len` elements, `q - p + 1` for
/// `q = p + (r - p) / 2`. Zero for an empty range.
#[inline]
pub(crate) fn left_len(len: usize) -> usize {
    len.div_ceil(2)
}

/// Run-time choice between the two scratch providers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferStrategy {
    /// See [`PerSortScratch`].
    #[default]
    PerSort,
    /// See [`PerMergeScratch`].
    PerMerge,
}

impl BufferStrategy {
    pub const ALL: [BufferStrategy; 2] = [BufferStrategy::PerSort, BufferStrategy::PerMerge];

    pub fn as_str(&self) -> &'static str {
        match self {
            BufferStrategy::PerSort => "per-sort",
            BufferStrategy::PerMerge => "per-merge",
        }
    }
}

impl fmt::Display for BufferStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown buffer strategy `{0}`, expected `per-sort` or `per-merge`")]
pub struct ParseStrategyError(String);

impl FromStr for BufferStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "per-sort" | "sort" | "f" => Ok(BufferStrategy::PerSort),
            "per-merge" | "merge" | "m" => Ok(BufferStrategy::PerMerge),
            _ => Err(ParseStrategyError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_len_matches_midpoint() {
        // [p, r] = [0, len - 1], q = (p + r) / 2.
        for len in 1..100usize {
            let q = (len - 1) / 2;
            assert_eq!(left_len(len), q + 1);
        }
        assert_eq!(left_len(13), 7);
        assert_eq!(left_len(12), 6);
        assert_eq!(left_len(0), 0);
        assert_eq!(left_len(usize::MAX), usize::MAX / 2 + 1);
    }

    #[test]
    fn per_sort_for_empty_sort_is_empty() {
        let mut scratch = PerSortScratch::for_sort_len(0).unwrap();
        assert!(scratch.is_empty());
        assert_eq!(scratch.allocations(), 1);

        // A single element never merges, so the empty buffer is enough.
        let mut v = [42];
        let stats = crate::HybridSorter::new()
            .sort_range_with(&mut v, 0, 0, &mut scratch)
            .unwrap();
        assert_eq!(v, [42]);
        assert_eq!(stats.merges, 0);
        assert_eq!(stats.scratch_allocations, 0);

        assert!(matches!(
            scratch.scratch(1),
            Err(SortError::ScratchTooSmall {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn per_sort_reuses_one_buffer() {
        let mut scratch = PerSortScratch::for_sort_len(100).unwrap();
        assert_eq!(scratch.len(), 50);
        assert_eq!(scratch.scratch(50).unwrap().len(), 50);
        assert_eq!(scratch.scratch(7).unwrap().len(), 7);
        assert_eq!(scratch.allocations(), 1);
    }

    #[test]
    fn per_sort_rejects_oversized_requests() {
        let mut scratch = PerSortScratch::with_len(4).unwrap();
        assert_eq!(
            scratch.scratch(5).unwrap_err(),
            SortError::ScratchTooSmall {
                requested: 5,
                available: 4
            }
        );
    }

    #[test]
    fn per_merge_allocates_every_request() {
        let mut scratch = PerMergeScratch::new();
        assert_eq!(scratch.scratch(3).unwrap().len(), 3);
        assert_eq!(scratch.scratch(9).unwrap().len(), 9);
        assert_eq!(scratch.allocations(), 2);
    }

    #[test]
    fn huge_allocation_reports_out_of_memory() {
        let requested = usize::MAX / 2;
        assert_eq!(
            try_alloc(requested).unwrap_err(),
            SortError::OutOfMemory { requested }
        );
    }

    #[test]
    fn strategy_round_trips_through_str() {
        for strategy in BufferStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<BufferStrategy>(), Ok(strategy));
        }
        assert_eq!("PER_MERGE".parse::<BufferStrategy>(), Ok(BufferStrategy::PerMerge));
        assert_eq!("f".parse::<BufferStrategy>(), Ok(BufferStrategy::PerSort));
        assert!("heap".parse::<BufferStrategy>().is_err());
    }
}

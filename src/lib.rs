//! Hybrid merge/insertion sort for `u32` slices.
//!
//! Partitions are halved until `r - p` drops to the base-case threshold, finished with insertion
//! sort, and merged back through a scratch buffer holding a copy of the left half. Where that
//! buffer comes from is a [`BufferStrategy`]: one allocation per sort, or one per merge.

use once_cell::sync::Lazy;

pub mod error;
pub mod hybrid;
pub mod insertion;
mod merge;
#[cfg(feature = "parallel")]
mod parallel;
pub mod scratch;

pub use error::SortError;
pub use hybrid::{HybridSorter, SortStats, DEFAULT_PARALLEL_CUTOFF, DEFAULT_THRESHOLD};
pub use scratch::{BufferStrategy, PerMergeScratch, PerSortScratch, ScratchProvider};

// Configuration is read from the environment once, the sorter itself is stateless.
static DEFAULT_SORTER: Lazy<HybridSorter> = Lazy::new(HybridSorter::from_env);

/// Sorts the inclusive range `[p, r]` of `v` in place with the default sorter.
///
/// The default sorter uses threshold 10 and one scratch allocation per sort, unless overridden by
/// `HYBRID_SORT_THRESHOLD` / `HYBRID_SORT_STRATEGY`.
pub fn sort(v: &mut [u32], p: usize, r: usize) -> Result<(), SortError> {
    DEFAULT_SORTER.sort_range(v, p, r).map(|_| ())
}

/// The sorter used by [`sort`].
pub fn default_sorter() -> &'static HybridSorter {
    &DEFAULT_SORTER
}

macro_rules! sort_impl {
    ($name:expr) => {
        pub struct SortImpl;

        impl sort_test_tools::Sort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            fn sort(arr: &mut [u32]) {
                if let Err(err) = sort(arr) {
                    panic!("{}: {}", $name, err);
                }
            }
        }
    };
}

pub mod stable;

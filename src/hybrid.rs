use std::env;

use tracing::{debug, trace, warn};

use crate::insertion::insertion_sort;
use crate::merge::merge;
use crate::scratch::{left_len, BufferStrategy, PerMergeScratch, PerSortScratch, ScratchProvider};
use crate::SortError;

/// Partitions with `r - p` at or below this are finished with insertion sort.
pub const DEFAULT_THRESHOLD: usize = 10;

/// Ranges at or below this length are not split across threads by the parallel sort.
pub const DEFAULT_PARALLEL_CUTOFF: usize = 4096;

/// Counters describing the work of one sort invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortStats {
    /// Partitions finished by insertion sort.
    pub insertion_sorts: usize,
    pub merges: usize,
    /// Heap allocations made for scratch space.
    pub scratch_allocations: usize,
    /// Deepest recursion level reached, the top-level range is depth 1.
    pub max_depth: usize,
}

impl SortStats {
    pub(crate) fn absorb(&mut self, other: SortStats) {
        self.insertion_sorts += other.insertion_sorts;
        self.merges += other.merges;
        self.scratch_allocations += other.scratch_allocations;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Merge sort over `u32` that hands small partitions to insertion sort.
///
/// Ranges are inclusive, `[p, r]`, and sorted in place. The split point is `q = (p + r) / 2`, so
/// the left half is never smaller than the right one. The scratch buffer used by merges comes
/// either from the configured [`BufferStrategy`] or from a caller supplied [`ScratchProvider`].
///
/// ```ignore
/// let sorter = HybridSorter::new().with_strategy(BufferStrategy::PerMerge);
/// let mut v = [5, 3, 8, 1];
/// sorter.sort_range(&mut v, 0, 3)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridSorter {
    threshold: usize,
    strategy: BufferStrategy,
    parallel_cutoff: usize,
}

impl Default for HybridSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridSorter {
    pub const fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: BufferStrategy::PerSort,
            parallel_cutoff: DEFAULT_PARALLEL_CUTOFF,
        }
    }

    /// Builds a sorter from `HYBRID_SORT_THRESHOLD` and `HYBRID_SORT_STRATEGY`. Unset variables
    /// keep their defaults, unparsable ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sorter = Self::new();

        if let Some(raw) = lookup("HYBRID_SORT_THRESHOLD") {
            match raw.trim().parse::<usize>() {
                Ok(threshold) => sorter.threshold = threshold,
                Err(err) => warn!(value = %raw, %err, "ignoring HYBRID_SORT_THRESHOLD"),
            }
        }

        if let Some(raw) = lookup("HYBRID_SORT_STRATEGY") {
            match raw.parse::<BufferStrategy>() {
                Ok(strategy) => sorter.strategy = strategy,
                Err(err) => warn!(%err, "ignoring HYBRID_SORT_STRATEGY"),
            }
        }

        sorter
    }

    pub const fn with_threshold(self, threshold: usize) -> Self {
        Self { threshold, ..self }
    }

    pub const fn with_strategy(self, strategy: BufferStrategy) -> Self {
        Self { strategy, ..self }
    }

    pub const fn with_parallel_cutoff(self, parallel_cutoff: usize) -> Self {
        Self {
            parallel_cutoff,
            ..self
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn strategy(&self) -> BufferStrategy {
        self.strategy
    }

    pub fn parallel_cutoff(&self) -> usize {
        self.parallel_cutoff
    }

    /// Sorts the whole slice. Empty slices are fine.
    pub fn sort(&self, v: &mut [u32]) -> Result<SortStats, SortError> {
        if v.is_empty() {
            return Ok(SortStats::default());
        }
        self.sort_range(v, 0, v.len() - 1)
    }

    /// Sorts the inclusive range `[p, r]` of `v` using the configured buffer strategy.
    ///
    /// The range is validated before anything is touched. If a scratch allocation fails midway
    /// the range holds a permutation of its input, only partially sorted.
    pub fn sort_range(&self, v: &mut [u32], p: usize, r: usize) -> Result<SortStats, SortError> {
        check_range(v.len(), p, r)?;
        debug!(
            p,
            r,
            threshold = self.threshold,
            strategy = %self.strategy,
            "hybrid sort"
        );
        self.sort_rebased(&mut v[p..=r], 1)
    }

    /// Like [`sort_range`](Self::sort_range), but every merge takes its scratch space from
    /// `scratch` instead of the configured strategy.
    pub fn sort_range_with<S>(
        &self,
        v: &mut [u32],
        p: usize,
        r: usize,
        scratch: &mut S,
    ) -> Result<SortStats, SortError>
    where
        S: ScratchProvider + ?Sized,
    {
        check_range(v.len(), p, r)?;
        debug!(p, r, threshold = self.threshold, "hybrid sort, caller scratch");

        let allocations_before = scratch.allocations();
        let mut stats = SortStats::default();
        self.sort_rec(&mut v[p..=r], scratch, 1, &mut stats)?;
        // Third-party providers may reset their counter.
        stats.scratch_allocations = scratch.allocations().saturating_sub(allocations_before);
        Ok(stats)
    }

    /// Sorts a non-empty range that has already been cut out of the sequence, so that `p` is 0
    /// and `r` is `v.len() - 1`. `depth` is the recursion level of `v`.
    pub(crate) fn sort_rebased(&self, v: &mut [u32], depth: usize) -> Result<SortStats, SortError> {
        let mut stats = SortStats::default();

        if self.is_base_case(v.len()) {
            stats.max_depth = depth;
            stats.insertion_sorts = 1;
            insertion_sort(v);
            return Ok(stats);
        }

        let allocations = match self.strategy {
            BufferStrategy::PerSort => {
                // Allocated up front for the top-level left half, the largest one any merge
                // below will copy.
                let mut scratch = PerSortScratch::for_sort_len(v.len())?;
                self.sort_rec(v, &mut scratch, depth, &mut stats)?;
                scratch.allocations()
            }
            BufferStrategy::PerMerge => {
                let mut scratch = PerMergeScratch::new();
                self.sort_rec(v, &mut scratch, depth, &mut stats)?;
                scratch.allocations()
            }
        };

        stats.scratch_allocations = allocations;
        Ok(stats)
    }

    fn sort_rec<S>(
        &self,
        v: &mut [u32],
        scratch: &mut S,
        depth: usize,
        stats: &mut SortStats,
    ) -> Result<(), SortError>
    where
        S: ScratchProvider + ?Sized,
    {
        stats.max_depth = stats.max_depth.max(depth);

        if self.is_base_case(v.len()) {
            insertion_sort(v);
            stats.insertion_sorts += 1;
            return Ok(());
        }

        let mid = left_len(v.len());
        {
            let (left, right) = v.split_at_mut(mid);
            self.sort_rec(left, scratch, depth + 1, stats)?;
            self.sort_rec(right, scratch, depth + 1, stats)?;
        }

        trace!(len = v.len(), mid, depth, "merge");
        merge(v, mid, scratch)?;
        stats.merges += 1;
        Ok(())
    }

    /// `r - p <= threshold` for a range of `len` elements.
    #[inline]
    pub(crate) fn is_base_case(&self, len: usize) -> bool {
        len <= self.threshold.saturating_add(1)
    }
}

pub(crate) fn check_range(len: usize, p: usize, r: usize) -> Result<(), SortError> {
    if p > r {
        return Err(SortError::InvalidRange { p, r });
    }
    if r >= len {
        return Err(SortError::OutOfBounds { r, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(check_range(10, 4, 3), Err(SortError::InvalidRange { p: 4, r: 3 }));
        assert_eq!(check_range(10, 0, 10), Err(SortError::OutOfBounds { r: 10, len: 10 }));
        assert_eq!(check_range(0, 0, 0), Err(SortError::OutOfBounds { r: 0, len: 0 }));
        assert_eq!(check_range(10, 9, 9), Ok(()));
    }

    #[test]
    fn base_case_boundary() {
        let sorter = HybridSorter::new();
        assert!(sorter.is_base_case(1));
        assert!(sorter.is_base_case(11));
        assert!(!sorter.is_base_case(12));

        let zero = HybridSorter::new().with_threshold(0);
        assert!(zero.is_base_case(1));
        assert!(!zero.is_base_case(2));

        let unbounded = HybridSorter::new().with_threshold(usize::MAX);
        assert!(unbounded.is_base_case(usize::MAX));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn env_config_parses_values() {
        let sorter = HybridSorter::from_lookup(vars(&[
            ("HYBRID_SORT_THRESHOLD", " 32 "),
            ("HYBRID_SORT_STRATEGY", "per_merge"),
        ]));
        assert_eq!(sorter.threshold(), 32);
        assert_eq!(sorter.strategy(), BufferStrategy::PerMerge);
        assert_eq!(sorter.parallel_cutoff(), DEFAULT_PARALLEL_CUTOFF);
    }

    #[test]
    fn env_config_ignores_invalid_values() {
        let sorter = HybridSorter::from_lookup(vars(&[
            ("HYBRID_SORT_THRESHOLD", "-3"),
            ("HYBRID_SORT_STRATEGY", "heap"),
        ]));
        assert_eq!(sorter, HybridSorter::new());

        assert_eq!(HybridSorter::from_lookup(vars(&[])), HybridSorter::new());
    }

    #[test]
    fn stats_absorb() {
        let mut a = SortStats {
            insertion_sorts: 2,
            merges: 1,
            scratch_allocations: 1,
            max_depth: 2,
        };
        a.absorb(SortStats {
            insertion_sorts: 4,
            merges: 3,
            scratch_allocations: 3,
            max_depth: 3,
        });
        assert_eq!(
            a,
            SortStats {
                insertion_sorts: 6,
                merges: 4,
                scratch_allocations: 4,
                max_depth: 3,
            }
        );
    }

    #[test]
    fn one_level_of_recursion() {
        let mut v = [5, 3, 8, 1, 9, 2, 7, 4, 6, 0, 12, 11, 10];
        let stats = HybridSorter::new().sort(&mut v).unwrap();
        assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(
            stats,
            SortStats {
                insertion_sorts: 2,
                merges: 1,
                scratch_allocations: 1,
                max_depth: 2,
            }
        );
    }
}

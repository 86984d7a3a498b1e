//! Fork/join variant of the hybrid sort.
//!
//! The two recursive half-sorts touch disjoint halves of the range, so they run as a
//! `rayon::join` pair and the merge waits for both. Below the parallel cutoff a branch falls back
//! to the sequential sort with its own scratch provider from the configured strategy. Merges above
//! the cutoff cannot share a buffer between concurrent branches and allocate their own.

use tracing::{debug, trace};

use crate::hybrid::{check_range, HybridSorter, SortStats};
use crate::merge::merge;
use crate::scratch::{left_len, PerMergeScratch, ScratchProvider};
use crate::SortError;

impl HybridSorter {
    /// Sorts the whole slice, forking above the parallel cutoff.
    pub fn par_sort(&self, v: &mut [u32]) -> Result<SortStats, SortError> {
        if v.is_empty() {
            return Ok(SortStats::default());
        }
        self.par_sort_range(v, 0, v.len() - 1)
    }

    /// Parallel counterpart of [`sort_range`](HybridSorter::sort_range), same output.
    pub fn par_sort_range(&self, v: &mut [u32], p: usize, r: usize) -> Result<SortStats, SortError> {
        check_range(v.len(), p, r)?;
        debug!(
            p,
            r,
            threshold = self.threshold(),
            strategy = %self.strategy(),
            cutoff = self.parallel_cutoff(),
            "parallel hybrid sort"
        );
        self.par_sort_rec(&mut v[p..=r], 1)
    }

    fn par_sort_rec(&self, v: &mut [u32], depth: usize) -> Result<SortStats, SortError> {
        if v.len() <= self.parallel_cutoff() || self.is_base_case(v.len()) {
            return self.sort_rebased(v, depth);
        }

        let mid = left_len(v.len());
        let (left, right) = v.split_at_mut(mid);
        let (left_stats, right_stats) = rayon::join(
            || self.par_sort_rec(left, depth + 1),
            || self.par_sort_rec(right, depth + 1),
        );

        let mut stats = left_stats?;
        stats.absorb(right_stats?);

        trace!(len = v.len(), mid, depth, "parallel merge");
        let mut scratch = PerMergeScratch::new();
        merge(v, mid, &mut scratch)?;
        stats.merges += 1;
        stats.scratch_allocations += scratch.allocations();
        Ok(stats)
    }
}

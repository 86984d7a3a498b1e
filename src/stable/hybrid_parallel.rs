use crate::{HybridSorter, SortError};

sort_impl!("hybrid_parallel");

// Low enough that the test sizes actually fork.
const SORTER: HybridSorter = HybridSorter::new().with_parallel_cutoff(256);

#[inline]
pub fn sort(arr: &mut [u32]) -> Result<(), SortError> {
    SORTER.par_sort(arr).map(|_| ())
}

use crate::{BufferStrategy, HybridSorter, SortError};

sort_impl!("hybrid_per_sort");

const SORTER: HybridSorter = HybridSorter::new().with_strategy(BufferStrategy::PerSort);

#[inline]
pub fn sort(arr: &mut [u32]) -> Result<(), SortError> {
    SORTER.sort(arr).map(|_| ())
}

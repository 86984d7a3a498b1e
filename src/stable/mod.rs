// std slice::sort, the baseline every flavour is compared against.
pub mod rust_std;

// One scratch buffer allocated before recursion, shared by all merges.
pub mod hybrid_per_sort;

// A fresh scratch buffer for every merge.
pub mod hybrid_per_merge;

// Both halves sorted concurrently via rayon::join.
#[cfg(feature = "parallel")]
pub mod hybrid_parallel;

/// Sorts `v` in place with insertion sort.
///
/// Stable, no-op for zero or one element. This is the base case of the hybrid sort, the closed
/// range `[left, right]` is passed in as `&mut v[left..=right]`.
pub fn insertion_sort(v: &mut [u32]) {
    for i in 1..v.len() {
        insert_tail(&mut v[..=i]);
    }
}

/// Inserts `v[v.len() - 1]` into pre-sorted sequence `v[..v.len() - 1]` so that whole `v[..]`
/// becomes sorted.
///
/// Instead of swapping adjacent pairs the element is held in `tmp`, every larger predecessor is
/// shifted up one slot, and `tmp` is written once into the remaining hole.
#[inline]
fn insert_tail(v: &mut [u32]) {
    let last = v.len() - 1;
    let tmp = v[last];

    // Strict comparison, equal elements stay behind their predecessors.
    if tmp >= v[last - 1] {
        return;
    }

    let mut hole = last;
    while hole > 0 && tmp < v[hole - 1] {
        v[hole] = v[hole - 1];
        hole -= 1;
    }
    v[hole] = tmp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_are_noops() {
        let mut empty: [u32; 0] = [];
        insertion_sort(&mut empty);

        let mut single = [42];
        insertion_sort(&mut single);
        assert_eq!(single, [42]);
    }

    #[test]
    fn sorts_small_inputs() {
        let mut v = [9, 1, 8, 2, 7, 3, 6, 4, 5, 0, u32::MAX];
        insertion_sort(&mut v);
        assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, u32::MAX]);

        let mut desc: Vec<u32> = (0..40).rev().collect();
        insertion_sort(&mut desc);
        assert_eq!(desc, (0..40).collect::<Vec<u32>>());
    }

    #[test]
    fn closed_sub_range() {
        let mut v = [9, 5, 4, 3, 1, 0];
        insertion_sort(&mut v[1..=4]);
        assert_eq!(v, [9, 1, 3, 4, 5, 0]);
    }
}

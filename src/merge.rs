use crate::scratch::ScratchProvider;
use crate::SortError;

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` into `v[..]`, copying the left run into
/// scratch space taken from `scratch`.
///
/// Both runs must be non-empty. On equal elements the left run wins, so the merge is stable.
pub(crate) fn merge<S>(v: &mut [u32], mid: usize, scratch: &mut S) -> Result<(), SortError>
where
    S: ScratchProvider + ?Sized,
{
    debug_assert!(mid > 0);
    debug_assert!(mid < v.len());

    let buf = scratch.scratch(mid)?;
    buf.copy_from_slice(&v[..mid]);
    merge_lo(v, buf);
    Ok(())
}

/// Interleaves `left`, a copy of `v[..left.len()]`, with the run `v[left.len()..]`.
///
/// Each cursor is checked for exhaustion explicitly, there is no sentinel past the end of `left`,
/// so `u32::MAX` is an ordinary value.
fn merge_lo(v: &mut [u32], left: &[u32]) {
    let len = v.len();
    let n1 = left.len();

    let mut i = 0;
    let mut j = n1;
    let mut out = 0;

    // `out == i + (j - n1) < j` while the left copy is unconsumed, so writes never overtake the
    // unread part of the right run.
    while i < n1 {
        if j >= len || left[i] <= v[j] {
            v[out] = left[i];
            i += 1;
        } else {
            v[out] = v[j];
            j += 1;
        }
        out += 1;
    }

    // Whatever is left of the right run already sits in its final position.
    debug_assert_eq!(out, j);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::{PerMergeScratch, PerSortScratch};

    fn merged(v: &[u32], mid: usize) -> Vec<u32> {
        let mut v = v.to_vec();
        merge(&mut v, mid, &mut PerMergeScratch::new()).unwrap();
        v
    }

    #[test]
    fn interleaves_runs() {
        assert_eq!(merged(&[1, 4, 6, 2, 3, 5], 3), [1, 2, 3, 4, 5, 6]);
        assert_eq!(merged(&[5, 1, 2, 3], 1), [1, 2, 3, 5]);
        assert_eq!(merged(&[1, 2, 3, 0], 3), [0, 1, 2, 3]);
    }

    #[test]
    fn right_run_exhausted_first() {
        assert_eq!(merged(&[7, 8, 9, 1, 2], 3), [1, 2, 7, 8, 9]);
    }

    #[test]
    fn left_run_exhausted_first() {
        assert_eq!(merged(&[1, 2, 7, 8, 9], 2), [1, 2, 7, 8, 9]);
    }

    #[test]
    fn max_value_is_not_a_sentinel() {
        assert_eq!(
            merged(&[3, u32::MAX, u32::MAX, 1, u32::MAX], 3),
            [1, 3, u32::MAX, u32::MAX, u32::MAX]
        );
        assert_eq!(merged(&[u32::MAX, 0], 1), [0, u32::MAX]);
    }

    #[test]
    fn duplicates_across_runs() {
        assert_eq!(merged(&[2, 4, 4, 2, 4, 5], 3), [2, 2, 4, 4, 4, 5]);
        assert_eq!(merged(&[1, 1, 1, 1], 2), [1, 1, 1, 1]);
    }

    #[test]
    fn shared_scratch_across_merges() {
        let mut scratch = PerSortScratch::with_len(3).unwrap();
        let mut a = [3, 5, 9, 1, 4, 10];
        merge(&mut a, 3, &mut scratch).unwrap();
        let mut b = [2, 0];
        merge(&mut b, 1, &mut scratch).unwrap();

        assert_eq!(a, [1, 3, 4, 5, 9, 10]);
        assert_eq!(b, [0, 2]);
        assert_eq!(scratch.allocations(), 1);
    }

    #[test]
    fn undersized_scratch_is_an_error() {
        let mut scratch = PerSortScratch::with_len(1).unwrap();
        let mut v = [3, 4, 1, 2];
        assert_eq!(
            merge(&mut v, 2, &mut scratch),
            Err(SortError::ScratchTooSmall {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(v, [3, 4, 1, 2]);
    }
}

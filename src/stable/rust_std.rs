use crate::SortError;

sort_impl!("rust_std_stable");

#[inline]
pub fn sort(arr: &mut [u32]) -> Result<(), SortError> {
    arr.sort();
    Ok(())
}

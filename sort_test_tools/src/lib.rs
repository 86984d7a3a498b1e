//! Shared test and benchmark tooling for the hybrid sort flavours.
//!
//! Every flavour implements [`Sort`], and `instantiate_sort_tests!` stamps out the full property
//! suite for it inside the calling test crate.

pub mod patterns;

#[doc(hidden)]
pub use paste;

/// A sort flavour under test.
pub trait Sort {
    fn name() -> String;

    /// Sorts the whole slice ascending. Panics if the flavour reports an error.
    fn sort(arr: &mut [u32]);
}

#[macro_export]
macro_rules! instantiate_sort_tests {
    ($sort_impl:ty) => {
        $crate::instantiate_sort_tests_gen!(
            $sort_impl;
            basic,
            fixed_scenarios,
            threshold_boundary,
            already_sorted_unchanged,
            idempotent,
            max_values,
            sub_slices
        );

        $crate::instantiate_pattern_tests_gen!(
            $sort_impl;
            random,
            random_binary,
            random_d20,
            random_zipf,
            random_sorted_90,
            all_equal,
            ascending,
            descending,
            saw_ascending,
            saw_descending,
            pipe_organ
        );
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! instantiate_sort_tests_gen {
    ($sort_impl:ty; $($test_fn:ident),*) => {
        $(
            #[test]
            fn $test_fn() {
                $crate::tests::$test_fn::<$sort_impl>();
            }
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! instantiate_pattern_tests_gen {
    ($sort_impl:ty; $($pattern:ident),*) => {
        $crate::paste::paste! {
            $(
                #[test]
                fn [<pattern_ $pattern>]() {
                    $crate::tests::pattern::<$sort_impl>($crate::patterns::$pattern);
                }
            )*
        }
    };
}

//! Input generators. All random patterns derive from one process-wide seed so a failing run can
//! be reproduced with `OVERRIDE_SEED=<seed>`.

use std::env;

use once_cell::sync::Lazy;
use rand::prelude::*;
use zipf::ZipfDistribution;

static SEED: Lazy<u64> = Lazy::new(|| {
    env::var("OVERRIDE_SEED")
        .ok()
        .and_then(|seed| seed.parse::<u64>().ok())
        .unwrap_or_else(|| thread_rng().gen())
});

pub fn random_init_seed() -> u64 {
    *SEED
}

// Mixing in the length keeps different sizes from being prefixes of each other.
fn new_rng(len: usize) -> StdRng {
    StdRng::seed_from_u64(random_init_seed() ^ (len as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

pub fn random(len: usize) -> Vec<u32> {
    //     .
    // : . : :
    // :.:::.::
    let mut rng = new_rng(len);
    (0..len).map(|_| rng.gen::<u32>()).collect()
}

pub fn random_uniform(len: usize, range: std::ops::Range<u32>) -> Vec<u32> {
    let mut rng = new_rng(len);
    (0..len).map(|_| rng.gen_range(range.clone())).collect()
}

pub fn random_binary(len: usize) -> Vec<u32> {
    random_uniform(len, 0..2)
}

pub fn random_d20(len: usize) -> Vec<u32> {
    random_uniform(len, 0..20)
}

pub fn random_zipf_with_exponent(len: usize, exponent: f64) -> Vec<u32> {
    // ZipfDistribution rejects zero elements.
    if len == 0 {
        return Vec::new();
    }

    let mut rng = new_rng(len);
    let dist = ZipfDistribution::new(len, exponent).expect("valid zipf parameters");
    (0..len).map(|_| dist.sample(&mut rng) as u32).collect()
}

pub fn random_zipf(len: usize) -> Vec<u32> {
    random_zipf_with_exponent(len, 1.0)
}

/// Ascending prefix of `sorted_percent` percent followed by random values.
pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<u32> {
    //     .:
    //   .:::. :
    // .::::::.::
    let mut v = random(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;
    v[..sorted_len].sort_unstable();
    v
}

pub fn random_sorted_90(len: usize) -> Vec<u32> {
    random_sorted(len, 90.0)
}

pub fn all_equal(len: usize) -> Vec<u32> {
    // ......
    // ::::::
    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<u32> {
    //     .:
    //   .:::
    // .:::::
    (0..len as u32).collect()
}

pub fn descending(len: usize) -> Vec<u32> {
    // :.
    // :::.
    // :::::.
    (0..len as u32).rev().collect()
}

fn saw(len: usize, teeth: usize, ascending: bool) -> Vec<u32> {
    if len == 0 {
        return Vec::new();
    }

    let tooth_len = (len / teeth).max(1);
    (0..len)
        .map(|i| {
            let pos = (i % tooth_len) as u32;
            if ascending {
                pos
            } else {
                tooth_len as u32 - pos
            }
        })
        .collect()
}

pub fn saw_ascending(len: usize) -> Vec<u32> {
    //   .:  .:
    // .:::.:::
    saw(len, (len as f64).log2().ceil().max(1.0) as usize, true)
}

pub fn saw_descending(len: usize) -> Vec<u32> {
    // :.  :.
    // :::.:::.
    saw(len, (len as f64).log2().ceil().max(1.0) as usize, false)
}

pub fn pipe_organ(len: usize) -> Vec<u32> {
    //   .:.
    // .:::::.
    let half = len / 2;
    let mut v: Vec<u32> = (0..half as u32).collect();
    v.extend((0..(len - half) as u32).rev());
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_match() {
        for len in [0, 1, 2, 7, 64, 1000] {
            assert_eq!(random(len).len(), len);
            assert_eq!(random_zipf(len).len(), len);
            assert_eq!(saw_ascending(len).len(), len);
            assert_eq!(saw_descending(len).len(), len);
            assert_eq!(pipe_organ(len).len(), len);
            assert_eq!(random_sorted_90(len).len(), len);
        }
    }

    #[test]
    fn same_seed_same_values() {
        assert_eq!(random(500), random(500));
    }

    #[test]
    fn uniform_stays_in_range() {
        assert!(random_d20(1000).iter().all(|&x| x < 20));
        assert!(random_binary(1000).iter().all(|&x| x < 2));
    }
}

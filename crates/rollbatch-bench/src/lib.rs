//! Benchmark profiles for the rollbatch tensor tree algebra.
//!
//! Provides pre-built rollout collections sized like real collector output:
//!
//! - [`reference_profile`]: 16 paths of up to 200 steps, 32-wide observations
//! - [`stress_profile`]: 64 paths of up to 1000 steps, 128-wide observations
//! - [`path_lengths`]: deterministic ragged lengths via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rollbatch_core::TensorTree;
use rollbatch_test_utils::rollout_paths;

/// Build the reference profile: 16 ragged paths, `obs_dim = 32`.
pub fn reference_profile(seed: u64) -> Vec<TensorTree<f32>> {
    rollout_paths(&path_lengths(16, 200, seed), 32)
}

/// Build the stress profile: 64 ragged paths, `obs_dim = 128`.
///
/// Same layout as [`reference_profile`] at roughly 40x the element count.
pub fn stress_profile(seed: u64) -> Vec<TensorTree<f32>> {
    rollout_paths(&path_lengths(64, 1000, seed), 128)
}

/// `count` path lengths in `[max_len / 2, max_len]`.
///
/// Uses a SplitMix64 sequence so lengths are reproducible without pulling
/// a RNG into the profile crate.
pub fn path_lengths(count: usize, max_len: usize, seed: u64) -> Vec<usize> {
    let floor = max_len / 2;
    let span = (max_len - floor + 1) as u64;
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            floor + (z % span) as usize
        })
        .collect()
}

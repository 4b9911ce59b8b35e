//! Property tests for the tree algebra laws.

use proptest::prelude::*;
use rollbatch_core::{BatchConfig, PadMode, TensorTree};
use rollbatch_ops::{
    concat_subsample_tree, flatten_tree, pad_tree, prepare_batch, seeded_rng, split_tree,
    stack_tree, truncate_tree, unflatten_tree,
};
use rollbatch_test_utils::{nested_ab, rollout_path, rollout_paths};

fn pad_mode() -> impl Strategy<Value = PadMode> {
    prop_oneof![Just(PadMode::Zero), Just(PadMode::Last)]
}

proptest! {
    #[test]
    fn flatten_tree_round_trips(len in 0usize..12, obs_dim in 1usize..5) {
        let tree = rollout_path(len, obs_dim);
        let (flat, schema) = flatten_tree(&tree);
        prop_assert_eq!(unflatten_tree(flat.view(), &schema).unwrap(), tree);
    }

    #[test]
    fn padded_tree_has_target_length(len in 1usize..10, extra in 0usize..6, mode in pad_mode()) {
        let padded = pad_tree(&nested_ab(len), len + extra, mode).unwrap();
        prop_assert_eq!(padded.leading_len().unwrap(), len + extra);
        // Padding to the current length again changes nothing.
        prop_assert_eq!(pad_tree(&padded, len + extra, mode).unwrap(), padded);
    }

    #[test]
    fn padding_keeps_the_original_prefix(len in 1usize..10, extra in 0usize..6, mode in pad_mode()) {
        let tree = rollout_path(len, 2);
        let padded = pad_tree(&tree, len + extra, mode).unwrap();
        prop_assert_eq!(truncate_tree(&padded, len).unwrap(), tree);
    }

    #[test]
    fn split_then_stack_is_identity(len in 1usize..10, obs_dim in 1usize..4) {
        let path = rollout_path(len, obs_dim);
        let rows = split_tree(&path).unwrap();
        prop_assert_eq!(rows.len(), len);
        prop_assert_eq!(stack_tree(&rows).unwrap(), path);
    }

    #[test]
    fn truncate_never_grows(len in 0usize..10, k in 0usize..15) {
        let cut = truncate_tree(&rollout_path(len, 2), k).unwrap();
        prop_assert_eq!(cut.leading_len().unwrap(), k.min(len));
    }

    #[test]
    fn subsample_tree_length_is_sum_of_ceils(
        lengths in prop::collection::vec(0usize..20, 1..5),
        fraction in 0.05f64..=1.0,
        seed in any::<u64>(),
    ) {
        let paths = rollout_paths(&lengths, 2);
        let out = concat_subsample_tree(&paths, fraction, &mut seeded_rng(seed)).unwrap();
        let expected: usize = lengths
            .iter()
            .map(|&n| (n as f64 * fraction).ceil() as usize)
            .sum();
        for (path, leaf) in out.leaves() {
            prop_assert_eq!(leaf.shape()[0], expected, "leaf {}", path);
        }
    }

    #[test]
    fn batch_shape_follows_longest_path(
        lengths in prop::collection::vec(1usize..15, 1..6),
        mode in pad_mode(),
    ) {
        let paths = rollout_paths(&lengths, 3);
        let batch = prepare_batch(&paths, &BatchConfig::new().with_pad_mode(mode)).unwrap();
        let longest = lengths.iter().copied().max().unwrap_or(0);
        let obs = batch.get_path("obs.pos").and_then(TensorTree::as_leaf).unwrap();
        prop_assert_eq!(obs.shape(), &[lengths.len(), longest, 3][..]);
    }
}

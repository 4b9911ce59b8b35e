//! Batch preparation for variable-length rollout paths.
//!
//! Combines truncation, padding, and stacking into the sequence a rollout
//! collector runs before handing a batch to a learner.

use crate::pad::pad_tree;
use crate::split::truncate_tree;
use crate::stack::stack_tree;
use rollbatch_core::{BatchConfig, Element, TensorTree, TreeError};

/// Build one `(paths, steps, ...)` batch from a list of path trees.
///
/// Each path is a tree whose leaves share a leading (time) axis. Paths are
/// truncated to `config.max_length` when set, padded to the longest
/// remaining path with `config.pad_mode`, then stacked.
///
/// # Errors
///
/// - [`TreeError::InvalidConfig`] if the config fails validation.
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::StructureMismatch`] if a path's leaves disagree on
///   length or its keys differ from the first path's.
/// - Any padding or stacking error.
///
/// # Examples
///
/// ```
/// use ndarray::arr1;
/// use rollbatch_core::{BatchConfig, PadMode, TensorTree};
/// use rollbatch_ops::prepare_batch;
///
/// let short = TensorTree::branch().with("reward", arr1(&[1.0f32]).into_dyn());
/// let long = TensorTree::branch().with("reward", arr1(&[1.0f32, 2.0, 3.0]).into_dyn());
///
/// let config = BatchConfig::new().with_pad_mode(PadMode::Last);
/// let batch = prepare_batch(&[short, long], &config).unwrap();
/// let rewards = batch.get("reward").unwrap().as_leaf().unwrap();
/// assert_eq!(rewards.shape(), &[2, 3]);
/// assert_eq!(rewards.iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 1.0, 1.0, 2.0, 3.0]);
/// ```
pub fn prepare_batch<A: Element>(
    paths: &[TensorTree<A>],
    config: &BatchConfig,
) -> Result<TensorTree<A>, TreeError> {
    config.validate()?;
    if paths.is_empty() {
        return Err(TreeError::EmptyInput {
            op: "prepare_batch",
        });
    }

    let truncated = match config.max_length {
        Some(max_length) => paths
            .iter()
            .map(|path| truncate_tree(path, max_length))
            .collect::<Result<Vec<_>, _>>()?,
        None => paths.to_vec(),
    };

    let lengths = truncated
        .iter()
        .map(TensorTree::leading_len)
        .collect::<Result<Vec<_>, _>>()?;
    let target = lengths.iter().copied().max().unwrap_or(0);
    tracing::debug!(
        paths = paths.len(),
        target,
        pad_mode = %config.pad_mode,
        "prepare_batch"
    );

    let padded = truncated
        .iter()
        .map(|path| pad_tree(path, target, config.pad_mode))
        .collect::<Result<Vec<_>, _>>()?;
    stack_tree(&padded)
}

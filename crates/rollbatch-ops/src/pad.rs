//! Padding along the leading (time) axis.
//!
//! [`pad`] honours [`PadMode`]. [`pad_batch`] always pads with zeros: it
//! writes each item into the prefix of a zero-filled slot, so the mode
//! has no effect there.

use crate::recurse::{check_alloc_size, require_leading_axis, shape_error};
use ndarray::{ArrayD, Axis, IxDyn, Slice};
use rollbatch_core::{Element, PadMode, TensorTree, TreeError};

/// Extend `array` to exactly `target_length` rows.
///
/// `Zero` appends rows of zeros; `Last` appends copies of the final row.
/// Padding to the current length returns a copy.
///
/// # Errors
///
/// - [`TreeError::PadTargetTooShort`] if `target_length` is below the
///   current length. Padding never truncates.
/// - [`TreeError::ShapeMismatch`] for zero-dimensional input, or if the
///   padded array would be too large to allocate.
/// - [`TreeError::EmptyInput`] for `Last` mode on an array with no rows
///   when rows must be added.
///
/// # Examples
///
/// ```
/// use ndarray::arr1;
/// use rollbatch_core::PadMode;
/// use rollbatch_ops::pad;
///
/// let padded = pad(&arr1(&[1, 2, 3]).into_dyn(), 5, PadMode::Last).unwrap();
/// assert_eq!(padded, arr1(&[1, 2, 3, 3, 3]).into_dyn());
/// ```
pub fn pad<A: Element>(
    array: &ArrayD<A>,
    target_length: usize,
    mode: PadMode,
) -> Result<ArrayD<A>, TreeError> {
    require_leading_axis("pad", array)?;
    let len = array.len_of(Axis(0));
    if target_length < len {
        return Err(TreeError::PadTargetTooShort {
            len,
            target: target_length,
        });
    }
    let extra = target_length - len;
    if extra == 0 {
        return Ok(array.clone());
    }

    let mut out_shape = array.shape().to_vec();
    out_shape[0] = target_length;
    check_alloc_size::<A>("pad", &out_shape)?;

    let mut block_shape = out_shape;
    block_shape[0] = extra;
    let block = match mode {
        PadMode::Zero => ArrayD::zeros(IxDyn(&block_shape)),
        PadMode::Last => {
            if len == 0 {
                return Err(TreeError::EmptyInput { op: "pad" });
            }
            array
                .index_axis(Axis(0), len - 1)
                .insert_axis(Axis(0))
                .broadcast(IxDyn(&block_shape))
                .map(|rows| rows.to_owned())
                .ok_or_else(|| TreeError::ShapeMismatch {
                    op: "pad",
                    reason: format!("cannot repeat last row to shape {block_shape:?}"),
                })?
        }
    };
    ndarray::concatenate(Axis(0), &[array.view(), block.view()]).map_err(shape_error("pad"))
}

/// Pack variable-length items into one zero-padded batch.
///
/// The result has shape `(arrays.len(), target_length, *item_shape)`,
/// where `item_shape` is every axis after the first. Each item fills the
/// leading rows of its slot; the rest stays zero.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::ShapeMismatch`] if items disagree on `item_shape`, are
///   zero-dimensional, or the batch would be too large to allocate.
/// - [`TreeError::PadTargetTooShort`] if an item is longer than
///   `target_length`.
pub fn pad_batch<A: Element>(
    arrays: &[ArrayD<A>],
    target_length: usize,
) -> Result<ArrayD<A>, TreeError> {
    let first = arrays.first().ok_or(TreeError::EmptyInput { op: "pad_batch" })?;
    require_leading_axis("pad_batch", first)?;
    let item_shape = &first.shape()[1..];

    let mut shape = Vec::with_capacity(item_shape.len() + 2);
    shape.push(arrays.len());
    shape.push(target_length);
    shape.extend_from_slice(item_shape);
    check_alloc_size::<A>("pad_batch", &shape)?;
    let mut out = ArrayD::zeros(IxDyn(&shape));

    for (idx, item) in arrays.iter().enumerate() {
        require_leading_axis("pad_batch", item)?;
        if &item.shape()[1..] != item_shape {
            return Err(TreeError::ShapeMismatch {
                op: "pad_batch",
                reason: format!(
                    "item {idx} has row shape {:?}, expected {item_shape:?}",
                    &item.shape()[1..]
                ),
            });
        }
        let len = item.len_of(Axis(0));
        if len > target_length {
            return Err(TreeError::PadTargetTooShort {
                len,
                target: target_length,
            });
        }
        out.index_axis_mut(Axis(0), idx)
            .slice_axis_mut(Axis(0), Slice::from(0..len))
            .assign(item);
    }
    Ok(out)
}

/// Apply [`pad`] to every leaf of `tree`.
pub fn pad_tree<A: Element>(
    tree: &TensorTree<A>,
    target_length: usize,
    mode: PadMode,
) -> Result<TensorTree<A>, TreeError> {
    tracing::debug!(leaves = tree.leaf_count(), target_length, %mode, "pad_tree");
    tree.try_map_leaves(|array| pad(array, target_length, mode))
}

//! Flattening a list of arrays into one buffer, and back.
//!
//! [`flatten`] and [`unflatten`] are inverses given the per-array shapes
//! that [`shapes_of`] records. The tree variants pair a flat buffer with
//! a [`TreeSchema`] instead of a shape list.

use crate::recurse::shape_error;
use indexmap::IndexMap;
use ndarray::{Array1, ArrayD, ArrayView1, Axis, IxDyn, Slice};
use rollbatch_core::{
    checked_element_count, shape_of, Element, Shape, TensorTree, TreeError, TreeSchema,
};

/// Concatenate the row-major elements of every array into one 1-D array.
///
/// An empty list yields an empty array.
///
/// # Examples
///
/// ```
/// use ndarray::{arr1, arr2};
/// use rollbatch_ops::flatten;
///
/// let flat = flatten(&[arr2(&[[1, 2], [3, 4]]).into_dyn(), arr1(&[5]).into_dyn()]);
/// assert_eq!(flat.to_vec(), vec![1, 2, 3, 4, 5]);
/// assert_eq!(flatten::<f32>(&[]).len(), 0);
/// ```
pub fn flatten<A: Element>(tensors: &[ArrayD<A>]) -> Array1<A> {
    let total = tensors.iter().map(|t| t.len()).sum();
    let mut data = Vec::with_capacity(total);
    for tensor in tensors {
        data.extend(tensor.iter().cloned());
    }
    Array1::from_vec(data)
}

/// Record the shape of every array, in order.
pub fn shapes_of<A>(tensors: &[ArrayD<A>]) -> Vec<Shape> {
    tensors.iter().map(shape_of).collect()
}

/// Split `flat` into consecutive segments and reshape each to the
/// corresponding entry of `shapes`.
///
/// # Errors
///
/// - [`TreeError::SizeMismatch`] if the shapes do not account for exactly
///   `flat.len()` elements. Nothing is truncated or padded.
/// - [`TreeError::ShapeMismatch`] if the shapes imply more elements than
///   `usize` can count.
pub fn unflatten<A: Element>(
    flat: ArrayView1<'_, A>,
    shapes: &[Shape],
) -> Result<Vec<ArrayD<A>>, TreeError> {
    let expected = shapes
        .iter()
        .try_fold(0usize, |acc, shape| acc.checked_add(checked_element_count(shape)?))
        .ok_or_else(|| count_overflow("unflatten"))?;
    if expected != flat.len() {
        return Err(TreeError::SizeMismatch {
            expected,
            actual: flat.len(),
        });
    }
    let mut offset = 0;
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let (array, next) = take_segment(flat, offset, shape)?;
        out.push(array);
        offset = next;
    }
    Ok(out)
}

fn count_overflow(op: &'static str) -> TreeError {
    TreeError::ShapeMismatch {
        op,
        reason: "element count of the shape descriptor overflows usize".into(),
    }
}

/// Callers check the total element count first, so the segment always
/// lies within `flat`.
fn take_segment<A: Element>(
    flat: ArrayView1<'_, A>,
    offset: usize,
    shape: &Shape,
) -> Result<(ArrayD<A>, usize), TreeError> {
    let end = checked_element_count(shape)
        .and_then(|len| offset.checked_add(len))
        .ok_or_else(|| count_overflow("unflatten"))?;
    let data: Vec<A> = flat
        .slice_axis(Axis(0), Slice::from(offset..end))
        .iter()
        .cloned()
        .collect();
    let array = ArrayD::from_shape_vec(IxDyn(shape), data).map_err(shape_error("unflatten"))?;
    Ok((array, end))
}

/// Flatten every leaf of `tree`, depth-first in key order.
///
/// Returns the buffer together with the schema needed to rebuild the tree
/// with [`unflatten_tree`].
pub fn flatten_tree<A: Element>(tree: &TensorTree<A>) -> (Array1<A>, TreeSchema) {
    let schema = tree.schema();
    let leaves = tree.leaves();
    let mut data = Vec::with_capacity(leaves.iter().map(|(_, leaf)| leaf.len()).sum());
    for (_, leaf) in leaves {
        data.extend(leaf.iter().cloned());
    }
    (Array1::from_vec(data), schema)
}

/// Rebuild a tree from a flat buffer and its schema.
///
/// # Errors
///
/// - [`TreeError::SizeMismatch`] if the schema does not account for
///   exactly `flat.len()` elements.
/// - [`TreeError::ShapeMismatch`] if the schema implies more elements than
///   `usize` can count.
pub fn unflatten_tree<A: Element>(
    flat: ArrayView1<'_, A>,
    schema: &TreeSchema,
) -> Result<TensorTree<A>, TreeError> {
    let expected = schema
        .element_count()
        .ok_or_else(|| count_overflow("unflatten_tree"))?;
    if expected != flat.len() {
        return Err(TreeError::SizeMismatch {
            expected,
            actual: flat.len(),
        });
    }
    let mut offset = 0;
    build_from_schema(flat, schema, &mut offset)
}

fn build_from_schema<A: Element>(
    flat: ArrayView1<'_, A>,
    schema: &TreeSchema,
    offset: &mut usize,
) -> Result<TensorTree<A>, TreeError> {
    match schema {
        TreeSchema::Leaf { shape } => {
            let (array, next) = take_segment(flat, *offset, shape)?;
            *offset = next;
            Ok(TensorTree::Leaf(array))
        }
        TreeSchema::Branch(children) => {
            let mut out = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let node = build_from_schema(flat, child, offset).map_err(|e| e.within(key))?;
                out.insert(key.clone(), node);
            }
            Ok(TensorTree::Branch(out))
        }
    }
}

/// Merge the two leading axes: `(n, m, ...)` becomes `(n * m, ...)`.
///
/// Used to turn a `(paths, steps, ...)` batch into one long list of steps.
///
/// # Errors
///
/// [`TreeError::ShapeMismatch`] if the array has fewer than two axes.
pub fn flatten_first_axis<A: Element>(array: &ArrayD<A>) -> Result<ArrayD<A>, TreeError> {
    if array.ndim() < 2 {
        return Err(TreeError::ShapeMismatch {
            op: "flatten_first_axis",
            reason: format!("need at least 2 axes, got shape {:?}", array.shape()),
        });
    }
    let shape = array.shape();
    let mut merged = Vec::with_capacity(shape.len() - 1);
    merged.push(shape[0] * shape[1]);
    merged.extend_from_slice(&shape[2..]);
    let data: Vec<A> = array.iter().cloned().collect();
    ArrayD::from_shape_vec(IxDyn(&merged), data).map_err(shape_error("flatten_first_axis"))
}

/// Apply [`flatten_first_axis`] to every leaf.
pub fn flatten_first_axis_tree<A: Element>(
    tree: &TensorTree<A>,
) -> Result<TensorTree<A>, TreeError> {
    tracing::debug!(leaves = tree.leaf_count(), "flatten_first_axis_tree");
    tree.try_map_leaves(flatten_first_axis)
}

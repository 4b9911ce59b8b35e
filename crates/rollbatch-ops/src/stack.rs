//! Stacking items along a new leading axis.

use crate::recurse::{shape_error, zip_leaves};
use ndarray::{ArrayD, Axis};
use rollbatch_core::{Element, TensorTree, TreeError};

/// Stack equally shaped arrays into one array with a new leading axis of
/// length `items.len()`.
///
/// No padding happens here; use [`pad_batch`](crate::pad_batch) for
/// ragged items.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::ShapeMismatch`] if any item's shape differs from the
///   first item's.
pub fn stack<A: Element>(items: &[ArrayD<A>]) -> Result<ArrayD<A>, TreeError> {
    let refs: Vec<&ArrayD<A>> = items.iter().collect();
    stack_arrays(&refs)
}

pub(crate) fn stack_arrays<A: Element>(items: &[&ArrayD<A>]) -> Result<ArrayD<A>, TreeError> {
    let first = items.first().ok_or(TreeError::EmptyInput { op: "stack" })?;
    if let Some((idx, item)) = items
        .iter()
        .enumerate()
        .find(|(_, item)| item.shape() != first.shape())
    {
        return Err(TreeError::ShapeMismatch {
            op: "stack",
            reason: format!(
                "item {idx} has shape {:?}, expected {:?}",
                item.shape(),
                first.shape()
            ),
        });
    }
    let views: Vec<_> = items.iter().map(|item| item.view()).collect();
    ndarray::stack(Axis(0), &views).map_err(shape_error("stack"))
}

/// Transpose a list of trees into one tree of stacked arrays.
///
/// For each key of the first tree the values from every tree are stacked
/// (leaves) or recursed into (branches).
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::StructureMismatch`] if a tree's keys differ from the
///   first tree's.
/// - Any [`stack`] error, wrapped with the failing leaf's path.
pub fn stack_tree<A: Element>(trees: &[TensorTree<A>]) -> Result<TensorTree<A>, TreeError> {
    zip_leaves("stack_tree", trees, &mut stack_arrays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr1, arr2, IxDyn};

    #[test]
    fn stacks_rows_in_order() {
        let items = vec![arr1(&[1, 2]).into_dyn(), arr1(&[3, 4]).into_dyn()];
        assert_eq!(stack(&items).unwrap(), arr2(&[[1, 2], [3, 4]]).into_dyn());
    }

    #[test]
    fn stacks_scalars_into_vector() {
        let items = vec![arr0(1.5f64).into_dyn(), arr0(2.5f64).into_dyn()];
        assert_eq!(stack(&items).unwrap(), arr1(&[1.5, 2.5]).into_dyn());
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let items = vec![arr1(&[1, 2]).into_dyn(), arr1(&[3]).into_dyn()];
        match stack(&items).unwrap_err() {
            TreeError::ShapeMismatch { op, reason } => {
                assert_eq!(op, "stack");
                assert!(reason.starts_with("item 1"));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_list_is_an_error() {
        assert_eq!(
            stack::<f32>(&[]).unwrap_err(),
            TreeError::EmptyInput { op: "stack" }
        );
        assert_eq!(
            stack_tree::<f32>(&[]).unwrap_err(),
            TreeError::EmptyInput { op: "stack_tree" }
        );
    }

    #[test]
    fn stack_tree_uses_first_tree_key_order() {
        let a = TensorTree::branch()
            .with("obs", arr1(&[1.0f32, 2.0]).into_dyn())
            .with("act", arr0(0.0f32).into_dyn());
        let b = TensorTree::branch()
            .with("act", arr0(1.0f32).into_dyn())
            .with("obs", arr1(&[3.0f32, 4.0]).into_dyn());
        let stacked = stack_tree(&[a, b]).unwrap();
        assert_eq!(stacked.keys().collect::<Vec<_>>(), vec!["obs", "act"]);
        assert_eq!(
            stacked.get("obs").unwrap().as_leaf().unwrap(),
            &arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn()
        );
        assert_eq!(
            stacked.get("act").unwrap().as_leaf().unwrap(),
            &arr1(&[0.0f32, 1.0]).into_dyn()
        );
    }

    #[test]
    fn stack_tree_rejects_divergent_keys() {
        let a = TensorTree::branch().with("x", ArrayD::<f32>::zeros(IxDyn(&[2])));
        let b = TensorTree::branch().with("y", ArrayD::<f32>::zeros(IxDyn(&[2])));
        assert!(matches!(
            stack_tree(&[a, b]),
            Err(TreeError::StructureMismatch { .. })
        ));
    }

    #[test]
    fn stack_tree_names_leaf_with_bad_shape() {
        let a = TensorTree::branch().with(
            "obs",
            TensorTree::branch().with("pos", ArrayD::<f32>::zeros(IxDyn(&[2]))),
        );
        let b = TensorTree::branch().with(
            "obs",
            TensorTree::branch().with("pos", ArrayD::<f32>::zeros(IxDyn(&[3]))),
        );
        match stack_tree(&[a, b]).unwrap_err() {
            TreeError::AtPath { path, source } => {
                assert_eq!(path, "obs.pos");
                assert!(matches!(*source, TreeError::ShapeMismatch { op: "stack", .. }));
            }
            other => panic!("expected AtPath, got {other:?}"),
        }
    }
}

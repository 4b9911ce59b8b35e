//! Splitting batched trees into per-row trees, and truncation.

use crate::recurse::require_leading_axis;
use ndarray::{ArrayD, Axis, Slice};
use rollbatch_core::{Element, TensorTree, TreeError};

/// One owned array per row of `array`.
///
/// # Errors
///
/// [`TreeError::ShapeMismatch`] for zero-dimensional input.
pub fn split<A: Element>(array: &ArrayD<A>) -> Result<Vec<ArrayD<A>>, TreeError> {
    require_leading_axis("split", array)?;
    Ok(array.outer_iter().map(|row| row.to_owned()).collect())
}

/// Inverse of [`stack_tree`](crate::stack_tree): one tree per row of the
/// leading axis, each with the same keys in the same order.
///
/// A leaf tree splits into leaf trees.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] if the tree has no leaves.
/// - [`TreeError::StructureMismatch`] if leaves disagree on the leading
///   length.
/// - [`TreeError::ShapeMismatch`] if a leaf is zero-dimensional.
pub fn split_tree<A: Element>(tree: &TensorTree<A>) -> Result<Vec<TensorTree<A>>, TreeError> {
    let rows = tree.leading_len()?;
    tracing::debug!(rows, leaves = tree.leaf_count(), "split_tree");
    Ok((0..rows).map(|row| row_of(tree, row)).collect())
}

fn row_of<A: Element>(tree: &TensorTree<A>, row: usize) -> TensorTree<A> {
    match tree {
        TensorTree::Leaf(array) => TensorTree::Leaf(array.index_axis(Axis(0), row).to_owned()),
        TensorTree::Branch(map) => TensorTree::Branch(
            map.iter()
                .map(|(key, child)| (key.clone(), row_of(child, row)))
                .collect(),
        ),
    }
}

/// The first `min(length, items.len())` items, borrowed without copying.
///
/// Never extends the list.
pub fn truncate<T>(items: &[T], length: usize) -> &[T] {
    &items[..length.min(items.len())]
}

/// The first `min(length, len)` rows of `array`.
///
/// # Errors
///
/// [`TreeError::ShapeMismatch`] for zero-dimensional input.
pub fn truncate_array<A: Element>(array: &ArrayD<A>, length: usize) -> Result<ArrayD<A>, TreeError> {
    require_leading_axis("truncate", array)?;
    let keep = length.min(array.len_of(Axis(0)));
    Ok(array.slice_axis(Axis(0), Slice::from(0..keep)).to_owned())
}

/// Apply [`truncate_array`] to every leaf.
pub fn truncate_tree<A: Element>(
    tree: &TensorTree<A>,
    length: usize,
) -> Result<TensorTree<A>, TreeError> {
    tracing::debug!(leaves = tree.leaf_count(), length, "truncate_tree");
    tree.try_map_leaves(|array| truncate_array(array, length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::stack_tree;
    use ndarray::{arr0, arr1, arr2, IxDyn};
    use proptest::prelude::*;

    #[test]
    fn split_yields_rows() {
        let x = arr2(&[[1, 2], [3, 4]]).into_dyn();
        assert_eq!(
            split(&x).unwrap(),
            vec![arr1(&[1, 2]).into_dyn(), arr1(&[3, 4]).into_dyn()]
        );
    }

    #[test]
    fn split_tree_builds_one_tree_per_row() {
        let tree = TensorTree::branch()
            .with("a", arr1(&[1, 2, 3]).into_dyn())
            .with("b", TensorTree::branch().with("c", arr2(&[[1, 1], [2, 2], [3, 3]]).into_dyn()));
        let rows = split_tree(&tree).unwrap();
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
            let v = i as i32 + 1;
            assert_eq!(row.get("a").unwrap().as_leaf().unwrap(), &arr0(v).into_dyn());
            assert_eq!(
                row.get_path("b.c").unwrap().as_leaf().unwrap(),
                &arr1(&[v, v]).into_dyn()
            );
        }
    }

    #[test]
    fn split_tree_rejects_ragged_leaves() {
        let tree = TensorTree::branch()
            .with("a", arr1(&[1, 2, 3]).into_dyn())
            .with("b", TensorTree::branch().with("c", arr1(&[1, 2]).into_dyn()));
        match split_tree(&tree).unwrap_err() {
            TreeError::StructureMismatch { path, .. } => assert_eq!(path, "b.c"),
            other => panic!("expected StructureMismatch, got {other:?}"),
        }
    }

    #[test]
    fn split_tree_of_empty_branch_is_an_error() {
        let tree: TensorTree<f32> = TensorTree::branch();
        assert!(matches!(split_tree(&tree), Err(TreeError::EmptyInput { .. })));
    }

    #[test]
    fn split_tree_of_zero_rows_is_empty() {
        let tree = TensorTree::branch().with("a", ArrayD::<f32>::zeros(IxDyn(&[0, 4])));
        assert!(split_tree(&tree).unwrap().is_empty());
    }

    #[test]
    fn truncate_never_extends() {
        let xs = [1, 2, 3];
        assert_eq!(truncate(&xs, 2), &[1, 2]);
        assert_eq!(truncate(&xs, 5), &[1, 2, 3]);
        assert!(truncate(&xs, 0).is_empty());
    }

    #[test]
    fn truncate_tree_cuts_every_leaf() {
        let tree = TensorTree::branch()
            .with("a", arr1(&[1, 2, 3, 4]).into_dyn())
            .with("b", TensorTree::branch().with("c", arr2(&[[1], [2], [3], [4]]).into_dyn()));
        let cut = truncate_tree(&tree, 2).unwrap();
        assert_eq!(cut.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(cut.get("a").unwrap().as_leaf().unwrap(), &arr1(&[1, 2]).into_dyn());
        assert_eq!(cut.get_path("b.c").unwrap().as_leaf().unwrap().shape(), &[2, 1]);
        assert_eq!(truncate_tree(&tree, 10).unwrap(), tree);
    }

    fn arb_steps() -> impl Strategy<Value = Vec<TensorTree<i32>>> {
        (1usize..6, 1usize..4).prop_flat_map(|(n, width)| {
            prop::collection::vec(
                (any::<i32>(), prop::collection::vec(any::<i32>(), width)),
                n,
            )
            .prop_map(|steps| {
                steps
                    .into_iter()
                    .map(|(reward, obs)| {
                        TensorTree::branch()
                            .with("reward", arr0(reward).into_dyn())
                            .with("obs", TensorTree::branch().with("pos", arr1(&obs).into_dyn()))
                    })
                    .collect::<Vec<_>>()
            })
        })
    }

    proptest! {
        #[test]
        fn split_inverts_stack(steps in arb_steps()) {
            let stacked = stack_tree(&steps).unwrap();
            let restored = split_tree(&stacked).unwrap();
            prop_assert_eq!(restored, steps);
        }

        #[test]
        fn truncated_length_is_min(len in 0usize..10, k in 0usize..15) {
            let xs: Vec<usize> = (0..len).collect();
            prop_assert_eq!(truncate(&xs, k).len(), k.min(len));
            let array = ArrayD::<f32>::zeros(IxDyn(&[len, 2]));
            prop_assert_eq!(truncate_array(&array, k).unwrap().len_of(Axis(0)), k.min(len));
        }
    }
}

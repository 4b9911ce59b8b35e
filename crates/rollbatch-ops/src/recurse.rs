//! Lock-step recursion over a list of trees.

use indexmap::IndexMap;
use ndarray::{ArrayD, ShapeError};
use rollbatch_core::{Element, TensorTree, TreeError};

/// Combine `trees` leaf by leaf.
///
/// The first tree is the template: its keys and their order define the
/// output. Every other tree is checked against it before any leaf is
/// touched. At each leaf position `f` receives the arrays from all trees
/// in input order.
pub(crate) fn zip_leaves<A, F>(
    op: &'static str,
    trees: &[TensorTree<A>],
    f: &mut F,
) -> Result<TensorTree<A>, TreeError>
where
    A: Element,
    F: FnMut(&[&ArrayD<A>]) -> Result<ArrayD<A>, TreeError>,
{
    let first = trees.first().ok_or(TreeError::EmptyInput { op })?;
    let schema = first.schema();
    for tree in &trees[1..] {
        schema.check_keys(tree)?;
    }
    tracing::debug!(op, trees = trees.len(), leaves = first.leaf_count(), "zip tensor trees");
    let nodes: Vec<&TensorTree<A>> = trees.iter().collect();
    zip_nodes(&nodes, f)
}

fn zip_nodes<A, F>(nodes: &[&TensorTree<A>], f: &mut F) -> Result<TensorTree<A>, TreeError>
where
    A: Element,
    F: FnMut(&[&ArrayD<A>]) -> Result<ArrayD<A>, TreeError>,
{
    match nodes[0] {
        TensorTree::Leaf(_) => {
            let arrays = nodes
                .iter()
                .map(|node| node.as_leaf())
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| mismatch("expected a leaf in every tree"))?;
            f(&arrays).map(TensorTree::Leaf)
        }
        TensorTree::Branch(template) => {
            let mut out = IndexMap::with_capacity(template.len());
            for key in template.keys() {
                let children = nodes
                    .iter()
                    .map(|node| node.get(key))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| mismatch("key missing from a later tree").within(key))?;
                let merged = zip_nodes(&children, f).map_err(|e| e.within(key))?;
                out.insert(key.clone(), merged);
            }
            Ok(TensorTree::Branch(out))
        }
    }
}

fn mismatch(reason: &str) -> TreeError {
    TreeError::StructureMismatch {
        path: String::new(),
        reason: reason.to_string(),
    }
}

/// Adapt an ndarray shape failure to [`TreeError::ShapeMismatch`].
pub(crate) fn shape_error(op: &'static str) -> impl Fn(ShapeError) -> TreeError {
    move |err| TreeError::ShapeMismatch {
        op,
        reason: err.to_string(),
    }
}

/// Reject output shapes too large to allocate.
///
/// ndarray panics rather than erroring when asked for more than
/// `isize::MAX` elements, and a `Vec` of more than `isize::MAX` bytes
/// cannot exist either. Axes of length zero make the array empty, so they
/// short-circuit the count the same way ndarray does.
pub(crate) fn check_alloc_size<A>(op: &'static str, shape: &[usize]) -> Result<(), TreeError> {
    if shape.contains(&0) {
        return Ok(());
    }
    let bytes = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .and_then(|count| count.checked_mul(std::mem::size_of::<A>().max(1)));
    match bytes {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(TreeError::ShapeMismatch {
            op,
            reason: format!("output shape {shape:?} is too large to allocate"),
        }),
    }
}

/// Reject zero-dimensional arrays, which have no leading axis.
pub(crate) fn require_leading_axis<A>(op: &'static str, array: &ArrayD<A>) -> Result<(), TreeError> {
    if array.ndim() == 0 {
        return Err(TreeError::ShapeMismatch {
            op,
            reason: "array is zero-dimensional and has no leading axis".into(),
        });
    }
    Ok(())
}

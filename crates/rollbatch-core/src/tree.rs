//! The [`TensorTree`] tagged variant.
//!
//! A tensor tree maps string keys to either an array or another tree.
//! Keys keep insertion order, which is the order every operation uses
//! when it walks a tree and when it assembles its output.

use crate::element::Element;
use crate::error::TreeError;
use crate::schema::TreeSchema;
use indexmap::IndexMap;
use ndarray::{ArrayD, Axis};

/// A recursively nested, string-keyed collection of arrays.
///
/// Trees are transient values: they are built by the caller, passed by
/// reference into the algebra, and every operation returns a freshly
/// allocated tree. Note that equality between two branches compares key
/// sets, not key order; use [`TensorTree::keys`] to check ordering.
///
/// # Examples
///
/// ```
/// use ndarray::{arr1, arr2};
/// use rollbatch_core::TensorTree;
///
/// let step = TensorTree::branch()
///     .with("reward", arr1(&[1.0f32, 0.5]).into_dyn())
///     .with(
///         "obs",
///         TensorTree::branch().with("pos", arr2(&[[0.0f32, 1.0], [2.0, 3.0]]).into_dyn()),
///     );
///
/// assert_eq!(step.keys().collect::<Vec<_>>(), vec!["reward", "obs"]);
/// assert_eq!(step.leaf_count(), 2);
/// assert!(step.get_path("obs.pos").unwrap().is_leaf());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum TensorTree<A> {
    /// A single array.
    Leaf(ArrayD<A>),
    /// An ordered mapping from key to subtree.
    Branch(IndexMap<String, TensorTree<A>>),
}

impl<A: Element> TensorTree<A> {
    /// An empty branch, the starting point for [`with`](Self::with).
    pub fn branch() -> Self {
        Self::Branch(IndexMap::new())
    }

    /// Wrap a single array.
    pub fn leaf(array: ArrayD<A>) -> Self {
        Self::Leaf(array)
    }

    /// Append `key` to this branch and return it.
    ///
    /// On a leaf the array is discarded and a fresh branch holding only
    /// `key` is returned. Re-inserting an existing key replaces its value
    /// but keeps its original position.
    pub fn with(self, key: impl Into<String>, value: impl Into<TensorTree<A>>) -> Self {
        let mut map = match self {
            Self::Branch(map) => map,
            Self::Leaf(_) => IndexMap::new(),
        };
        map.insert(key.into(), value.into());
        Self::Branch(map)
    }

    /// Returns `true` for [`TensorTree::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The wrapped array, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&ArrayD<A>> {
        match self {
            Self::Leaf(array) => Some(array),
            Self::Branch(_) => None,
        }
    }

    /// The child mapping, if this is a branch.
    pub fn as_branch(&self) -> Option<&IndexMap<String, TensorTree<A>>> {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(map) => Some(map),
        }
    }

    /// Consume the tree and return its array, if it is a leaf.
    pub fn into_leaf(self) -> Option<ArrayD<A>> {
        match self {
            Self::Leaf(array) => Some(array),
            Self::Branch(_) => None,
        }
    }

    /// Immediate child under `key`. Always `None` on a leaf.
    pub fn get(&self, key: &str) -> Option<&TensorTree<A>> {
        self.as_branch().and_then(|map| map.get(key))
    }

    /// Descendant at a dotted path such as `"obs.pos"`.
    ///
    /// The empty path returns `self`.
    pub fn get_path(&self, path: &str) -> Option<&TensorTree<A>> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, key| node.get(key))
    }

    /// Immediate keys in order. Empty on a leaf.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_branch()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Every leaf with its dotted path, depth-first in key order.
    ///
    /// A root leaf is reported with the empty path.
    pub fn leaves(&self) -> Vec<(String, &ArrayD<A>)> {
        let mut out = Vec::with_capacity(self.leaf_count());
        collect_leaves(self, String::new(), &mut out);
        out
    }

    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(map) => map.values().map(TensorTree::leaf_count).sum(),
        }
    }

    /// Apply `f` to every leaf, keeping keys and order.
    pub fn map_leaves<B, F>(&self, mut f: F) -> TensorTree<B>
    where
        F: FnMut(&ArrayD<A>) -> ArrayD<B>,
    {
        fn go<A, B, F: FnMut(&ArrayD<A>) -> ArrayD<B>>(
            node: &TensorTree<A>,
            f: &mut F,
        ) -> TensorTree<B> {
            match node {
                TensorTree::Leaf(array) => TensorTree::Leaf(f(array)),
                TensorTree::Branch(map) => TensorTree::Branch(
                    map.iter().map(|(k, v)| (k.clone(), go(v, f))).collect(),
                ),
            }
        }
        go(self, &mut f)
    }

    /// Apply a fallible `f` to every leaf, keeping keys and order.
    ///
    /// The first error stops the walk and is returned with the failing
    /// leaf's path attached (see [`TreeError::within`]).
    pub fn try_map_leaves<B, F>(&self, mut f: F) -> Result<TensorTree<B>, TreeError>
    where
        F: FnMut(&ArrayD<A>) -> Result<ArrayD<B>, TreeError>,
    {
        fn go<A, B, F: FnMut(&ArrayD<A>) -> Result<ArrayD<B>, TreeError>>(
            node: &TensorTree<A>,
            f: &mut F,
        ) -> Result<TensorTree<B>, TreeError> {
            match node {
                TensorTree::Leaf(array) => f(array).map(TensorTree::Leaf),
                TensorTree::Branch(map) => {
                    let mut out = IndexMap::with_capacity(map.len());
                    for (key, child) in map {
                        let mapped = go(child, f).map_err(|e| e.within(key))?;
                        out.insert(key.clone(), mapped);
                    }
                    Ok(TensorTree::Branch(out))
                }
            }
        }
        go(self, &mut f)
    }

    /// Structural description of this tree: keys and leaf shapes.
    pub fn schema(&self) -> TreeSchema {
        TreeSchema::of(self)
    }

    /// The leading-axis length shared by every leaf.
    ///
    /// # Errors
    ///
    /// - [`TreeError::EmptyInput`] if the tree has no leaves.
    /// - [`TreeError::ShapeMismatch`] if a leaf is zero-dimensional.
    /// - [`TreeError::StructureMismatch`] if two leaves disagree, naming
    ///   the first leaf that differs from the first leaf seen.
    pub fn leading_len(&self) -> Result<usize, TreeError> {
        let mut first: Option<(String, usize)> = None;
        for (path, array) in self.leaves() {
            if array.ndim() == 0 {
                return Err(TreeError::ShapeMismatch {
                    op: "leading_len",
                    reason: "leaf is zero-dimensional".into(),
                }
                .within_path(&path));
            }
            let len = array.len_of(Axis(0));
            if let Some((first_path, first_len)) = &first {
                if *first_len != len {
                    return Err(TreeError::StructureMismatch {
                        path,
                        reason: format!(
                            "leading length {len} differs from {first_len} at '{first_path}'"
                        ),
                    });
                }
            } else {
                first = Some((path, len));
            }
        }
        first
            .map(|(_, len)| len)
            .ok_or(TreeError::EmptyInput { op: "leading_len" })
    }
}

fn collect_leaves<'a, A>(
    node: &'a TensorTree<A>,
    path: String,
    out: &mut Vec<(String, &'a ArrayD<A>)>,
) {
    match node {
        TensorTree::Leaf(array) => out.push((path, array)),
        TensorTree::Branch(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                collect_leaves(child, child_path, out);
            }
        }
    }
}

impl<A> From<ArrayD<A>> for TensorTree<A> {
    fn from(array: ArrayD<A>) -> Self {
        Self::Leaf(array)
    }
}

impl<A, K: Into<String>> FromIterator<(K, TensorTree<A>)> for TensorTree<A> {
    fn from_iter<I: IntoIterator<Item = (K, TensorTree<A>)>>(iter: I) -> Self {
        Self::Branch(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

//! Explicit structural schemas for tensor trees.
//!
//! Combining operations take the first tree of a collection as the
//! template for the output. A [`TreeSchema`] captured from that template
//! is checked against every other tree up front, so a divergent key is
//! reported at once with its path instead of surfacing later as a
//! missing-key failure halfway through the recursion.

use crate::element::{checked_element_count, shape_of, Element, Shape};
use crate::error::TreeError;
use crate::tree::TensorTree;
use indexmap::IndexMap;

/// Key structure and leaf shapes of a [`TensorTree`].
///
/// Also serves as the shape descriptor when a tree is rebuilt from a
/// flat buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeSchema {
    /// A leaf array of the given shape.
    Leaf {
        /// Shape of the array.
        shape: Shape,
    },
    /// A branch with ordered children.
    Branch(IndexMap<String, TreeSchema>),
}

impl TreeSchema {
    /// Capture the schema of `tree`.
    pub fn of<A: Element>(tree: &TensorTree<A>) -> Self {
        match tree {
            TensorTree::Leaf(array) => Self::Leaf {
                shape: shape_of(array),
            },
            TensorTree::Branch(map) => Self::Branch(
                map.iter()
                    .map(|(key, child)| (key.clone(), Self::of(child)))
                    .collect(),
            ),
        }
    }

    /// Total number of elements across all leaves, or `None` if the count
    /// overflows `usize`.
    ///
    /// A schema captured from a real tree never overflows; a hand-built
    /// one can.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Self::Leaf { shape } => checked_element_count(shape),
            Self::Branch(map) => map
                .values()
                .try_fold(0usize, |acc, child| acc.checked_add(child.element_count()?)),
        }
    }

    /// Leaf shapes, depth-first in key order.
    pub fn leaf_shapes(&self) -> Vec<Shape> {
        let mut out = Vec::new();
        self.collect_shapes(&mut out);
        out
    }

    fn collect_shapes(&self, out: &mut Vec<Shape>) {
        match self {
            Self::Leaf { shape } => out.push(shape.clone()),
            Self::Branch(map) => map.values().for_each(|child| child.collect_shapes(out)),
        }
    }

    /// Check that `tree` has the same keys and leaf/branch layout as this
    /// schema. Key order may differ; leaf shapes are not compared.
    ///
    /// # Errors
    ///
    /// [`TreeError::StructureMismatch`] naming the path of the first
    /// divergence.
    pub fn check_keys<A: Element>(&self, tree: &TensorTree<A>) -> Result<(), TreeError> {
        self.check_inner(tree, false)
    }

    /// Like [`check_keys`](Self::check_keys), and additionally require
    /// every leaf shape to match exactly.
    pub fn check<A: Element>(&self, tree: &TensorTree<A>) -> Result<(), TreeError> {
        self.check_inner(tree, true)
    }

    fn check_inner<A: Element>(
        &self,
        tree: &TensorTree<A>,
        shapes: bool,
    ) -> Result<(), TreeError> {
        match (self, tree) {
            (Self::Leaf { shape }, TensorTree::Leaf(array)) => {
                if shapes && shape.as_slice() != array.shape() {
                    return Err(TreeError::StructureMismatch {
                        path: String::new(),
                        reason: format!(
                            "expected shape {:?}, got {:?}",
                            shape.as_slice(),
                            array.shape()
                        ),
                    });
                }
                Ok(())
            }
            (Self::Branch(expected), TensorTree::Branch(actual)) => {
                let missing: Vec<&str> = expected
                    .keys()
                    .filter(|k| !actual.contains_key(k.as_str()))
                    .map(String::as_str)
                    .collect();
                let unexpected: Vec<&str> = actual
                    .keys()
                    .filter(|k| !expected.contains_key(k.as_str()))
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() || !unexpected.is_empty() {
                    return Err(TreeError::StructureMismatch {
                        path: String::new(),
                        reason: format!("missing keys {missing:?}, unexpected keys {unexpected:?}"),
                    });
                }
                for (key, child) in expected {
                    if let Some(other) = actual.get(key) {
                        child
                            .check_inner(other, shapes)
                            .map_err(|e| e.within(key))?;
                    }
                }
                Ok(())
            }
            (Self::Leaf { .. }, TensorTree::Branch(_)) => Err(TreeError::StructureMismatch {
                path: String::new(),
                reason: "expected a leaf, found a branch".into(),
            }),
            (Self::Branch(_), TensorTree::Leaf(_)) => Err(TreeError::StructureMismatch {
                path: String::new(),
                reason: "expected a branch, found a leaf".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use proptest::prelude::*;

    fn leaf(shape: &[usize]) -> TensorTree<f32> {
        TensorTree::Leaf(ArrayD::zeros(IxDyn(shape)))
    }

    #[test]
    fn schema_counts_elements() {
        let tree = TensorTree::branch()
            .with("a", leaf(&[3, 2]))
            .with("b", TensorTree::branch().with("c", leaf(&[4])));
        let schema = tree.schema();
        assert_eq!(schema.element_count(), Some(10));
        assert_eq!(schema.leaf_shapes().len(), 2);
    }

    #[test]
    fn oversized_schema_has_no_element_count() {
        let huge = TreeSchema::Leaf {
            shape: Shape::from_slice(&[usize::MAX, 3]),
        };
        assert_eq!(huge.element_count(), None);

        let mut children = IndexMap::new();
        children.insert("a".to_string(), TreeSchema::Leaf { shape: Shape::from_slice(&[usize::MAX]) });
        children.insert("b".to_string(), TreeSchema::Leaf { shape: Shape::from_slice(&[2]) });
        assert_eq!(TreeSchema::Branch(children).element_count(), None);
    }

    #[test]
    fn check_keys_ignores_order_and_shapes() {
        let a = TensorTree::branch().with("x", leaf(&[2])).with("y", leaf(&[2]));
        let b = TensorTree::branch().with("y", leaf(&[5])).with("x", leaf(&[5]));
        assert!(a.schema().check_keys(&b).is_ok());
        assert!(a.schema().check(&b).is_err());
    }

    #[test]
    fn check_keys_names_nested_path() {
        let a = TensorTree::branch().with("obs", TensorTree::branch().with("pos", leaf(&[1])));
        let b = TensorTree::branch().with("obs", TensorTree::branch().with("vel", leaf(&[1])));
        match a.schema().check_keys(&b).unwrap_err() {
            TreeError::StructureMismatch { path, reason } => {
                assert_eq!(path, "obs");
                assert!(reason.contains("pos"));
                assert!(reason.contains("vel"));
            }
            other => panic!("expected StructureMismatch, got {other:?}"),
        }
    }

    #[test]
    fn leaf_versus_branch_is_rejected() {
        let a = TensorTree::branch().with("x", leaf(&[1]));
        let b = TensorTree::branch().with("x", TensorTree::branch().with("y", leaf(&[1])));
        match a.schema().check_keys(&b).unwrap_err() {
            TreeError::StructureMismatch { path, .. } => assert_eq!(path, "x"),
            other => panic!("expected StructureMismatch, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn schema_of_tree_checks_against_itself(
            shapes in prop::collection::vec(prop::collection::vec(1usize..4, 0..3), 1..5)
        ) {
            let tree: TensorTree<f32> = shapes
                .iter()
                .enumerate()
                .map(|(i, s)| (format!("k{i}"), leaf(s)))
                .collect();
            let schema = tree.schema();
            prop_assert!(schema.check(&tree).is_ok());
            let expected: usize = shapes.iter().map(|s| s.iter().product::<usize>()).sum();
            prop_assert_eq!(schema.element_count(), Some(expected));
        }
    }
}

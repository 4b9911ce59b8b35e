//! Element bound and shape descriptors for tree leaves.

use ndarray::ArrayD;
use smallvec::SmallVec;
use std::fmt::Debug;

/// Shape of one array: one entry per axis, row-major.
///
/// Rollout tensors rarely exceed four axes, so shapes stay inline.
pub type Shape = SmallVec<[usize; 4]>;

/// Element type stored in the leaves of a [`TensorTree`](crate::TensorTree).
///
/// Blanket-implemented for every type that can be cloned, compared, and
/// has an additive zero, which covers all primitive integer and float
/// types.
pub trait Element: Clone + num_traits::Zero + PartialEq + Debug + 'static {}

impl<T> Element for T where T: Clone + num_traits::Zero + PartialEq + Debug + 'static {}

/// Number of elements an array of `shape` holds, or `None` if the
/// product overflows `usize`.
///
/// The empty shape describes a scalar and holds one element.
pub fn checked_element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Capture the shape of an array as a [`Shape`].
pub fn shape_of<A>(array: &ArrayD<A>) -> Shape {
    SmallVec::from_slice(array.shape())
}

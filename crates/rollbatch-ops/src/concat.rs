//! Concatenation along the leading axis, with optional random row
//! subsampling.
//!
//! Subsampling takes its randomness from a caller-supplied generator.
//! Pass the same seeded generator (see [`seeded_rng`]) to reproduce a
//! draw exactly.

use crate::recurse::{require_leading_axis, shape_error, zip_leaves};
use ndarray::{ArrayD, Axis};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rollbatch_core::{Element, SamplingError, TensorTree, TreeError};

/// A deterministic generator for [`concat_subsample`] and
/// [`concat_subsample_tree`].
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Join arrays end to end along the leading axis.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::ShapeMismatch`] if the arrays disagree on any axis other
///   than the first, or are zero-dimensional.
pub fn concat<A: Element>(items: &[ArrayD<A>]) -> Result<ArrayD<A>, TreeError> {
    let refs: Vec<&ArrayD<A>> = items.iter().collect();
    concat_arrays(&refs)
}

fn concat_arrays<A: Element>(items: &[&ArrayD<A>]) -> Result<ArrayD<A>, TreeError> {
    let first = items.first().ok_or(TreeError::EmptyInput { op: "concat" })?;
    for (idx, item) in items.iter().enumerate() {
        require_leading_axis("concat", *item)?;
        if item.ndim() != first.ndim() || item.shape()[1..] != first.shape()[1..] {
            return Err(TreeError::ShapeMismatch {
                op: "concat",
                reason: format!(
                    "item {idx} has shape {:?}, incompatible with {:?}",
                    item.shape(),
                    first.shape()
                ),
            });
        }
    }
    let views: Vec<_> = items.iter().map(|item| item.view()).collect();
    ndarray::concatenate(Axis(0), &views).map_err(shape_error("concat"))
}

/// Number of rows to draw from an array of `len` rows.
///
/// `len as f64` rounds once `len` exceeds 2^53, so `ceil(len * fraction)`
/// can land above `len` even for `fraction <= 1`; that case is
/// `NotEnoughRows` rather than a failed draw.
fn sample_count(len: usize, fraction: f64) -> Result<usize, SamplingError> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(SamplingError::InvalidFraction { fraction });
    }
    let requested = (len as f64 * fraction).ceil() as usize;
    if requested > len {
        return Err(SamplingError::NotEnoughRows {
            available: len,
            requested,
        });
    }
    Ok(requested)
}

/// Draw `ceil(len * fraction)` distinct rows of `array`, uniformly
/// without replacement, in draw order.
///
/// # Errors
///
/// - [`SamplingError::InvalidFraction`] unless `0 < fraction <= 1`.
/// - [`TreeError::ShapeMismatch`] for zero-dimensional input.
pub fn subsample_rows<A, R>(
    array: &ArrayD<A>,
    fraction: f64,
    rng: &mut R,
) -> Result<ArrayD<A>, TreeError>
where
    A: Element,
    R: Rng + ?Sized,
{
    require_leading_axis("subsample_rows", array)?;
    let len = array.len_of(Axis(0));
    let count = sample_count(len, fraction)?;
    let rows = index::sample(rng, len, count).into_vec();
    tracing::trace!(len, count, "subsample rows");
    Ok(array.select(Axis(0), &rows))
}

/// Subsample every item with [`subsample_rows`], then [`concat`] the
/// samples in input order.
///
/// The result has `sum(ceil(len_i * fraction))` rows. Repeated calls with
/// an unseeded generator differ in content, never in length.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::Sampling`] for an invalid fraction.
/// - [`TreeError::ShapeMismatch`] as for [`concat`].
pub fn concat_subsample<A, R>(
    items: &[ArrayD<A>],
    fraction: f64,
    rng: &mut R,
) -> Result<ArrayD<A>, TreeError>
where
    A: Element,
    R: Rng + ?Sized,
{
    let refs: Vec<&ArrayD<A>> = items.iter().collect();
    concat_subsample_arrays(&refs, fraction, rng)
}

fn concat_subsample_arrays<A, R>(
    items: &[&ArrayD<A>],
    fraction: f64,
    rng: &mut R,
) -> Result<ArrayD<A>, TreeError>
where
    A: Element,
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return Err(TreeError::EmptyInput {
            op: "concat_subsample",
        });
    }
    let samples = items
        .iter()
        .map(|item| subsample_rows(*item, fraction, &mut *rng))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&ArrayD<A>> = samples.iter().collect();
    concat_arrays(&refs)
}

/// Apply [`concat`] leaf by leaf across a list of trees.
///
/// # Errors
///
/// - [`TreeError::EmptyInput`] for an empty list.
/// - [`TreeError::StructureMismatch`] if a tree's keys differ from the
///   first tree's.
/// - Any [`concat`] error, wrapped with the failing leaf's path.
pub fn concat_tree<A: Element>(trees: &[TensorTree<A>]) -> Result<TensorTree<A>, TreeError> {
    zip_leaves("concat_tree", trees, &mut concat_arrays)
}

/// Apply [`concat_subsample`] leaf by leaf across a list of trees.
///
/// Each leaf draws its own rows, so row `i` of one leaf need not come
/// from the same step as row `i` of another.
pub fn concat_subsample_tree<A, R>(
    trees: &[TensorTree<A>],
    fraction: f64,
    rng: &mut R,
) -> Result<TensorTree<A>, TreeError>
where
    A: Element,
    R: Rng + ?Sized,
{
    sample_count(0, fraction)?;
    zip_leaves(
        "concat_subsample_tree",
        trees,
        &mut |arrays: &[&ArrayD<A>]| concat_subsample_arrays(arrays, fraction, &mut *rng),
    )
}

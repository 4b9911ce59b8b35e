//! Test fixtures for rollbatch development.
//!
//! Provides deterministic arrays and rollout-shaped trees:
//!
//! - [`ramp`]: an array filled with `0, 1, 2, ...` in row-major order.
//! - [`rollout_step`] / [`rollout_path`]: one step, or a whole path, of a
//!   toy agent with `obs.pos`, `obs.vel`, `action`, and `reward` leaves.
//! - [`nested_ab`]: the minimal two-level tree `{a, b: {c}}`.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use ndarray::{Array1, ArrayD, IxDyn};
use rollbatch_core::TensorTree;

/// Array of `shape` holding `0.0, 1.0, ...` in row-major order.
pub fn ramp(shape: &[usize]) -> ArrayD<f32> {
    let len: usize = shape.iter().product();
    let data: Vec<f32> = (0..len).map(|i| i as f32).collect();
    ArrayD::from_shape_vec(IxDyn(shape), data).expect("ramp data matches shape")
}

fn position(t: usize, obs_dim: usize) -> Vec<f32> {
    (0..obs_dim).map(|j| (t * obs_dim + j) as f32).collect()
}

/// A single step at time `t`.
///
/// Leaves are `obs.pos` and `obs.vel` of shape `(obs_dim,)`, and scalar
/// `action` and `reward`. `obs.vel` is the negation of `obs.pos`.
pub fn rollout_step(t: usize, obs_dim: usize) -> TensorTree<f32> {
    let pos = Array1::from_vec(position(t, obs_dim));
    let vel = pos.mapv(|x| -x);
    TensorTree::branch()
        .with(
            "obs",
            TensorTree::branch()
                .with("pos", pos.into_dyn())
                .with("vel", vel.into_dyn()),
        )
        .with("action", ArrayD::from_elem(IxDyn(&[]), (t % 4) as f32))
        .with("reward", ArrayD::from_elem(IxDyn(&[]), t as f32 * 0.5))
}

/// A path of `len` steps: every leaf of [`rollout_step`] gains a leading
/// time axis. Row `t` of each leaf equals step `t`.
pub fn rollout_path(len: usize, obs_dim: usize) -> TensorTree<f32> {
    let pos: Vec<f32> = (0..len).flat_map(|t| position(t, obs_dim)).collect();
    let vel: Vec<f32> = pos.iter().map(|x| -x).collect();
    let action: Vec<f32> = (0..len).map(|t| (t % 4) as f32).collect();
    let reward: Vec<f32> = (0..len).map(|t| t as f32 * 0.5).collect();
    let obs_shape = IxDyn(&[len, obs_dim]);
    TensorTree::branch()
        .with(
            "obs",
            TensorTree::branch()
                .with(
                    "pos",
                    ArrayD::from_shape_vec(obs_shape.clone(), pos).expect("pos matches shape"),
                )
                .with(
                    "vel",
                    ArrayD::from_shape_vec(obs_shape, vel).expect("vel matches shape"),
                ),
        )
        .with("action", Array1::from_vec(action).into_dyn())
        .with("reward", Array1::from_vec(reward).into_dyn())
}

/// Paths of the given lengths, all with the same `obs_dim`.
pub fn rollout_paths(lengths: &[usize], obs_dim: usize) -> Vec<TensorTree<f32>> {
    lengths
        .iter()
        .map(|&len| rollout_path(len, obs_dim))
        .collect()
}

/// `{a: (len,), b: {c: (len, 2)}}`, both leaves ramps.
pub fn nested_ab(len: usize) -> TensorTree<f32> {
    TensorTree::branch()
        .with("a", ramp(&[len]))
        .with("b", TensorTree::branch().with("c", ramp(&[len, 2])))
}

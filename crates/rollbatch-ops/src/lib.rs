//! The rollbatch tensor tree algebra.
//!
//! Pure, stateless functions over flat lists of arrays and over
//! [`TensorTree`](rollbatch_core::TensorTree)s. Every tree operation walks
//! the tree by variant: leaf primitives run at arrays, branches recurse
//! key by key and reassemble a branch with the same keys in the same
//! order.
//!
//! | Module | Array-level | Tree-level |
//! |--------|-------------|------------|
//! | [`flat`] | [`flatten`], [`unflatten`], [`flatten_first_axis`] | [`flatten_tree`], [`unflatten_tree`], [`flatten_first_axis_tree`] |
//! | [`pad`] | [`pad()`], [`pad_batch`] | [`pad_tree`] |
//! | [`stack`] | [`stack()`] | [`stack_tree`] |
//! | [`concat`] | [`concat()`], [`concat_subsample`] | [`concat_tree`], [`concat_subsample_tree`] |
//! | [`split`] | [`split()`], [`truncate`], [`truncate_array`] | [`split_tree`], [`truncate_tree`] |
//! | [`batch`] | | [`prepare_batch`] |
//! | [`normalize`] | [`normalize_probs`] | |
//!
//! No operation panics on malformed input. Shape, structure, and
//! sampling problems come back as [`TreeError`](rollbatch_core::TreeError).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod concat;
pub mod flat;
pub mod normalize;
pub mod pad;
mod recurse;
pub mod split;
pub mod stack;

pub use batch::prepare_batch;
pub use concat::{
    concat, concat_subsample, concat_subsample_tree, concat_tree, seeded_rng, subsample_rows,
};
pub use flat::{
    flatten, flatten_first_axis, flatten_first_axis_tree, flatten_tree, shapes_of, unflatten,
    unflatten_tree,
};
pub use normalize::normalize_probs;
pub use pad::{pad, pad_batch, pad_tree};
pub use split::{split, split_tree, truncate, truncate_array, truncate_tree};
pub use stack::{stack, stack_tree};

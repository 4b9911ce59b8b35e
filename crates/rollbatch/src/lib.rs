//! rollbatch: batching, padding, and reshaping for nested trajectory tensors.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the rollbatch sub-crates. For most users, adding `rollbatch` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::{arr1, arr2};
//! use rollbatch::prelude::*;
//!
//! // Two paths of different lengths with the same keys.
//! let short = TensorTree::branch()
//!     .with("obs", arr2(&[[0.0f32, 1.0]]).into_dyn())
//!     .with("reward", arr1(&[1.0f32]).into_dyn());
//! let long = TensorTree::branch()
//!     .with("obs", arr2(&[[2.0f32, 3.0], [4.0, 5.0], [6.0, 7.0]]).into_dyn())
//!     .with("reward", arr1(&[0.0f32, 0.0, 1.0]).into_dyn());
//!
//! // Pad to the longest path and stack into (paths, steps, ...).
//! let batch = prepare_batch(&[short, long], &BatchConfig::new()).unwrap();
//! assert_eq!(batch.get("obs").unwrap().as_leaf().unwrap().shape(), &[2, 3, 2]);
//!
//! // Merge paths and steps back into one long list of steps.
//! let steps = flatten_first_axis_tree(&batch).unwrap();
//! assert_eq!(steps.get("reward").unwrap().as_leaf().unwrap().shape(), &[6]);
//!
//! // And split that into per-step trees.
//! assert_eq!(split_tree(&steps).unwrap().len(), 6);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `rollbatch-core` | `TensorTree`, `TreeSchema`, config, errors |
//! | [`ops`] | `rollbatch-ops` | Flatten, pad, stack, concat, split, truncate |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Tree types, schemas, configuration, and errors (`rollbatch-core`).
pub use rollbatch_core as core;

/// The tensor tree algebra (`rollbatch-ops`).
///
/// Array-level primitives plus their tree-level counterparts, which
/// recurse through branches and preserve key order.
pub use rollbatch_ops as ops;

/// Common imports for typical rollbatch usage.
///
/// ```rust
/// use rollbatch::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rollbatch_core::{BatchConfig, Element, PadMode, Shape, TensorTree, TreeSchema};

    // Errors
    pub use rollbatch_core::{SamplingError, TreeError};

    // Tree operations
    pub use rollbatch_ops::{
        concat_subsample_tree, concat_tree, flatten_first_axis_tree, flatten_tree, pad_tree,
        prepare_batch, seeded_rng, split_tree, stack_tree, truncate_tree, unflatten_tree,
    };
}

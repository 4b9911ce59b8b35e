//! Core types for the rollbatch tensor tree algebra.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! tagged [`TensorTree`] variant, the [`TreeSchema`] used to validate
//! collections of trees before they are combined, the element bound for
//! array contents, configuration enums, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod element;
pub mod error;
pub mod schema;
pub mod tree;

pub use config::{BatchConfig, PadMode};
pub use element::{checked_element_count, shape_of, Element, Shape};
pub use error::{SamplingError, TreeError};
pub use schema::TreeSchema;
pub use tree::TensorTree;

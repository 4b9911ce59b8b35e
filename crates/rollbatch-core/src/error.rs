//! Error types for tensor tree operations.
//!
//! Organized by failure class: size and shape disagreements between
//! arrays, structural (key set) disagreements between trees, invalid
//! sampling parameters, and degenerate empty input.

use std::error::Error;
use std::fmt;

/// Errors from any tensor tree operation.
///
/// Every operation returns these instead of panicking. Errors raised at
/// a leaf deep inside a tree are wrapped in [`TreeError::AtPath`] so the
/// caller can see which key failed.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeError {
    /// The operation is undefined on an empty list.
    EmptyInput {
        /// Name of the operation that received the empty input.
        op: &'static str,
    },
    /// A flat buffer does not hold the number of elements its shape
    /// descriptor implies.
    SizeMismatch {
        /// Element count implied by the shapes.
        expected: usize,
        /// Element count actually present.
        actual: usize,
    },
    /// Arrays passed together do not have compatible shapes.
    ShapeMismatch {
        /// Name of the operation that rejected the shapes.
        op: &'static str,
        /// Description of the disagreement.
        reason: String,
    },
    /// Trees passed together do not share the same key structure, or
    /// their leaves disagree on the leading-axis length.
    StructureMismatch {
        /// Dotted key path of the first divergence (empty for the root).
        path: String,
        /// Description of the divergence.
        reason: String,
    },
    /// The requested pad length is shorter than the array being padded.
    PadTargetTooShort {
        /// Leading-axis length of the input.
        len: usize,
        /// Requested length.
        target: usize,
    },
    /// A configuration value is out of range.
    InvalidConfig {
        /// Description of the invalid value.
        reason: String,
    },
    /// Random subsampling could not be performed.
    Sampling(SamplingError),
    /// A leaf-level error raised while recursing into a tree.
    AtPath {
        /// Dotted key path of the failing leaf.
        path: String,
        /// The underlying error.
        source: Box<TreeError>,
    },
}

impl TreeError {
    /// Attach the key of the enclosing branch to this error.
    ///
    /// Called on the way back up a recursion, so the resulting path reads
    /// root-first (`"obs.pixels"`).
    pub fn within(self, key: &str) -> Self {
        match self {
            Self::AtPath { path, source } => Self::AtPath {
                path: join_path(key, &path),
                source,
            },
            Self::StructureMismatch { path, reason } => Self::StructureMismatch {
                path: join_path(key, &path),
                reason,
            },
            other => Self::AtPath {
                path: key.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Attach a full dotted path, as if the error had bubbled up through
    /// each of its keys.
    pub fn within_path(self, path: &str) -> Self {
        if path.is_empty() {
            self
        } else {
            path.rsplit('.').fold(self, |err, key| err.within(key))
        }
    }

    /// Strip any [`TreeError::AtPath`] wrappers and return the leaf error.
    pub fn root_cause(&self) -> &TreeError {
        match self {
            Self::AtPath { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn join_path(prefix: &str, rest: &str) -> String {
    if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}.{rest}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { op } => write!(f, "{op}: empty input"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: shapes imply {expected} elements, got {actual}")
            }
            Self::ShapeMismatch { op, reason } => write!(f, "{op}: shape mismatch: {reason}"),
            Self::StructureMismatch { path, reason } => {
                write!(f, "structure mismatch at '{}': {reason}", display_path(path))
            }
            Self::PadTargetTooShort { len, target } => {
                write!(f, "cannot pad length {len} down to {target}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
            Self::Sampling(err) => write!(f, "sampling failed: {err}"),
            Self::AtPath { path, source } => write!(f, "at '{path}': {source}"),
        }
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sampling(err) => Some(err),
            Self::AtPath { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<SamplingError> for TreeError {
    fn from(err: SamplingError) -> Self {
        Self::Sampling(err)
    }
}

/// Errors from random row subsampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplingError {
    /// The sampling fraction is not a finite value in `(0, 1]`.
    InvalidFraction {
        /// The rejected fraction.
        fraction: f64,
    },
    /// More distinct rows were requested than the array holds.
    NotEnoughRows {
        /// Rows present along the leading axis.
        available: usize,
        /// Rows requested.
        requested: usize,
    },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFraction { fraction } => {
                write!(f, "fraction {fraction} is outside (0, 1]")
            }
            Self::NotEnoughRows {
                available,
                requested,
            } => write!(
                f,
                "requested {requested} distinct rows but only {available} available"
            ),
        }
    }
}

impl Error for SamplingError {}

//! Padding and batch preparation parameters.

use crate::error::TreeError;
use std::fmt;
use std::str::FromStr;

/// How padding fills the rows it appends along the leading axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PadMode {
    /// Append rows of zeros shaped like one input row.
    #[default]
    Zero,
    /// Append copies of the input's final row.
    Last,
}

impl PadMode {
    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PadMode {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "last" => Ok(Self::Last),
            other => Err(TreeError::InvalidConfig {
                reason: format!("unknown pad mode '{other}', expected 'zero' or 'last'"),
            }),
        }
    }
}

/// Parameters for turning a list of variable-length rollout paths into
/// one fixed-length batch.
///
/// Paths are first truncated to `max_length` (when set), then padded to
/// the longest remaining path with `pad_mode`, then stacked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Upper bound on the time dimension of the batch.
    ///
    /// Default: `None` (keep every step). Must be at least 1 when set.
    pub max_length: Option<usize>,

    /// Fill rule for paths shorter than the batch length.
    ///
    /// Default: [`PadMode::Zero`].
    pub pad_mode: PadMode,
}

impl BatchConfig {
    /// Default pad mode for batch preparation.
    pub const DEFAULT_PAD_MODE: PadMode = PadMode::Zero;

    /// Create a config with no length cap and the default pad mode.
    pub fn new() -> Self {
        Self {
            max_length: None,
            pad_mode: Self::DEFAULT_PAD_MODE,
        }
    }

    /// Cap the time dimension at `max_length` steps.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the pad mode.
    pub fn with_pad_mode(mut self, pad_mode: PadMode) -> Self {
        self.pad_mode = pad_mode;
        self
    }

    /// Check that all values are in range.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfig`] if `max_length` is `Some(0)`.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.max_length == Some(0) {
            return Err(TreeError::InvalidConfig {
                reason: "max_length must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

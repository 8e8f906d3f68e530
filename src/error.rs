//! Error types for catalog construction and configuration loading.
//!
//! Generation itself never fails; everything here surfaces at startup, before
//! the first expression is produced.

use thiserror::Error;

/// Errors raised while building a generator or loading its configuration.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The effective catalog has no entries.
    #[error("catalog contains no operations")]
    EmptyCatalog,

    /// A catalog entry declared a weight of zero.
    #[error("catalog entry {index} has zero weight")]
    ZeroWeight { index: usize },

    /// The summed weights do not fit the random source's integer range.
    #[error("total catalog weight exceeds {}", u32::MAX)]
    WeightOverflow,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a configuration or replay file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or emit JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

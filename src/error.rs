//! Error types for topomap.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for map construction, training and streaming.
#[derive(Error, Debug)]
pub enum SomError {
    /// A constructor or method argument is out of its allowed range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An input vector does not have the model's dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality the model was built with.
        expected: usize,
        /// The dimensionality of the offending input.
        actual: usize,
    },

    /// Empty input where at least one element is required.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A time series received a sample older than its last one.
    #[error("Non-monotonic time: {time} precedes {last}")]
    NonMonotonicTime {
        /// The rejected timestamp.
        time: u64,
        /// The most recent timestamp already stored.
        last: u64,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: {index} >= {max}")]
    IndexOutOfBounds {
        /// The index that was out of bounds.
        index: usize,
        /// The number of addressable elements.
        max: usize,
    },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed text input (CLI data files).
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for topomap operations.
pub type Result<T> = std::result::Result<T, SomError>;

/// Fails with [`SomError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn ensure_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SomError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Fails with [`SomError::InvalidArgument`] unless every component is finite.
pub(crate) fn ensure_finite(input: &[f64]) -> Result<()> {
    if let Some(pos) = input.iter().position(|v| !v.is_finite()) {
        return Err(SomError::InvalidArgument(format!(
            "input component {} is not finite ({})",
            pos, input[pos]
        )));
    }
    Ok(())
}

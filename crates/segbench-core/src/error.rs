//! Error types for benchmark input loading and scoring.
//!
//! Classification itself cannot fail; every error here comes from reading
//! or validating the ground-truth and prediction files of a document.

use std::path::PathBuf;
use thiserror::Error;

/// Error types that can occur while benchmarking a document.
///
/// # Examples
///
/// ```rust
/// use segbench_core::{Rectangle, SegbenchError};
///
/// match Rectangle::from_width_height(10.0, 10.0, -5.0, 20.0) {
///     Err(SegbenchError::InvalidRectangle { .. }) => {}
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum SegbenchError {
    /// File I/O error.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that could not be read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A label or prediction file is not valid JSON for its schema.
    #[error("Failed to parse {path}: {source}")]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Rectangle coordinates violate `right >= left`, `bottom >= top`
    /// or are not finite.
    #[error("Invalid rectangle (left={left}, top={top}, right={right}, bottom={bottom})")]
    InvalidRectangle {
        /// Left edge.
        left: f64,
        /// Top edge.
        top: f64,
        /// Right edge.
        right: f64,
        /// Bottom edge.
        bottom: f64,
    },

    /// A label type index outside the fixed vocabulary.
    #[error("Unknown label type index: {0}")]
    UnknownLabelType(u32),

    /// No ground-truth label file exists for a prediction file.
    #[error("Ground truth not found: {0}")]
    MissingGroundTruth(PathBuf),

    /// Writing the PDF overlay failed.
    #[error("Overlay error: {0}")]
    Overlay(String),
}

/// Result type alias for benchmark operations.
pub type Result<T> = std::result::Result<T, SegbenchError>;

impl SegbenchError {
    /// Wrap an I/O error with the path it happened on.
    #[inline]
    #[must_use = "returns the wrapped error"]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON decode error with the file it came from.
    #[inline]
    #[must_use = "returns the wrapped error"]
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SegbenchError::UnknownLabelType(42);
        assert_eq!(err.to_string(), "Unknown label type index: 42");

        let err = SegbenchError::MissingGroundTruth(PathBuf::from("dataset/doc/labels.json"));
        assert!(err.to_string().contains("dataset/doc/labels.json"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = SegbenchError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("missing.json"));
        assert!(message.contains("gone"));
    }
}

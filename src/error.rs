//! Error types for repdf library.

use std::io;
use thiserror::Error;

/// Result type alias for repdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rebuilding a page.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing the output document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A page dimension is zero, negative or not finite.
    #[error("Invalid page size: {width} x {height} (both dimensions must be positive)")]
    InvalidPageSize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// Text, box and label lists are not index-aligned.
    #[error("Length mismatch: {texts} texts, {boxes} boxes, {labels} labels")]
    LengthMismatch {
        /// Number of texts
        texts: usize,
        /// Number of boxes
        boxes: usize,
        /// Number of labels
        labels: usize,
    },

    /// A font file could not be read or parsed.
    #[error("Font loading error: {0}")]
    FontLoad(String),

    /// Error building or serializing the PDF object graph.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A drawing primitive rejected its input.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid or unreadable JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a length mismatch error from the three list lengths.
    pub fn length_mismatch(texts: usize, boxes: usize, labels: usize) -> Self {
        Error::LengthMismatch {
            texts,
            boxes,
            labels,
        }
    }

    /// Check if this error is a configuration error raised before drawing.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidPageSize { .. } | Error::LengthMismatch { .. }
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::length_mismatch(3, 2, 3);
        assert_eq!(
            err.to_string(),
            "Length mismatch: 3 texts, 2 boxes, 3 labels"
        );

        let err = Error::InvalidPageSize {
            width: 0.0,
            height: 800.0,
        };
        assert!(err.to_string().starts_with("Invalid page size: 0 x 800"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(Error::length_mismatch(1, 0, 0).is_configuration());
        assert!(Error::InvalidPageSize {
            width: -1.0,
            height: 1.0
        }
        .is_configuration());
        assert!(!Error::Render("x".into()).is_configuration());
    }
}

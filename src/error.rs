//! Error types for engagement-heatmap operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synthesizing, rendering or saving a chart.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for framebuffer or figure.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data length does not match the declared matrix shape.
    #[error("Data length mismatch: expected {expected} elements, got {actual}")]
    DataLengthMismatch {
        /// Number of cells implied by rows x cols.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., equal min and max).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// A synthesis or rendering parameter is out of range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch { expected: 168, actual: 20 };
        assert!(err.to_string().contains("168"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_invalid_parameter_names_field() {
        let err = Error::InvalidParameter { name: "noise_std", message: "must be >= 0".into() };
        let display = err.to_string();
        assert!(display.contains("noise_std"));
        assert!(display.contains(">= 0"));
    }

    #[test]
    fn test_config_parse_includes_line() {
        let err = Error::ConfigParse { line: 4, message: "bad value".into() };
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

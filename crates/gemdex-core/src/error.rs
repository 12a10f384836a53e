//! Error types for Gemdex operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Gemdex crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Gemdex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the offending path attached.
    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata store error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record is missing its business key or carries invalid fields.
    /// Rejected before any store mutation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The persisted vector index is unreadable or does not match the
    /// configured embedding dimension. Fatal for the store instance;
    /// never silently recreated.
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// The embedding capability is not available in this build or
    /// failed to initialise.
    #[error("Embedding capability unavailable: {0}")]
    Capability(String),

    /// A backend operation failed.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create a corrupt index error.
    pub fn corrupt_index(msg: impl Into<String>) -> Self {
        Self::CorruptIndex(msg.into())
    }

    /// Create a capability error.
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error with the path it occurred at.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoAt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias using Gemdex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        assert!(matches!(Error::config("bad"), Error::Config(_)));
        assert!(matches!(Error::not_found("gone"), Error::NotFound(_)));
        assert!(matches!(
            Error::invalid_record("no name"),
            Error::InvalidRecord(_)
        ));
        assert!(matches!(Error::corrupt_index("bad"), Error::CorruptIndex(_)));
        assert!(matches!(Error::capability("off"), Error::Capability(_)));
        assert!(matches!(Error::operation("boom"), Error::Operation(_)));
    }

    #[test]
    fn test_display_messages() {
        let err = Error::corrupt_index("dimension mismatch: expected 384, found 768");
        assert!(err.to_string().contains("Corrupt index"));
        assert!(err.to_string().contains("384"));

        let err = Error::invalid_record("missing name");
        assert!(err.to_string().contains("Invalid record"));
    }

    #[test]
    fn test_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err = Error::io_with_path(io, "/some/where/vectors.json");
        assert!(err.to_string().contains("/some/where/vectors.json"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "io");
        assert!(matches!(Error::from(io), Error::Io(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("not json")?)
        }
        assert!(matches!(parse(), Err(Error::Serialization(_))));
    }
}

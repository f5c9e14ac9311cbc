//! Error types for GovBRNews operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all GovBRNews crates. Uses `thiserror` for derive macros.

use thiserror::Error;

/// Errors that can occur in GovBRNews operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// Path being accessed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document, collection or resource does not exist.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Kind of the missing thing ("document", "collection", ...).
        resource_type: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// The search engine rejected our credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The search engine failed or could not be reached.
    #[error("Search backend error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Backend {
        /// Human-readable description.
        message: String,
        /// HTTP status, when the engine answered at all.
        status: Option<u16>,
    },

    /// Caller-supplied arguments are invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic operation failure.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create an I/O error carrying the path that failed.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<std::path::Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a backend error without an HTTP status.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend {
            message: msg.into(),
            status: None,
        }
    }

    /// Create a backend error for a non-success HTTP status.
    pub fn backend_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Backend {
            message: msg.into(),
            status: Some(status),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Returns true if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the failure came from the search engine side.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Unauthorized(_))
    }

    /// Returns true if this is an invalid input error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias using GovBRNews's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("document", "254647");
        assert_eq!(err.to_string(), "document not found: 254647");
        assert!(err.is_not_found());
        assert!(!err.is_backend());
    }

    #[test]
    fn test_backend_display_with_status() {
        let err = Error::backend_status(503, "service unavailable");
        assert_eq!(
            err.to_string(),
            "Search backend error (HTTP 503): service unavailable"
        );
        assert!(err.is_backend());
    }

    #[test]
    fn test_backend_display_without_status() {
        let err = Error::backend("connection refused");
        assert_eq!(err.to_string(), "Search backend error: connection refused");
    }

    #[test]
    fn test_unauthorized_is_backend() {
        assert!(Error::unauthorized("bad key").is_backend());
    }

    #[test]
    fn test_invalid_input() {
        let err = Error::invalid_input("granularity");
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("granularity"));
    }

    #[test]
    fn test_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/config.toml");
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::other("boom");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

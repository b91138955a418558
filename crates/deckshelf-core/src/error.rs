//! Error types for deckshelf.
//!
//! Every fallible operation in the crate returns [`ShelfError`]. Codec
//! failures are never retried; I/O and network failures may be retried by
//! re-running the whole operation, since catalog mutation and reconciliation
//! are idempotent with respect to already-applied state.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deckshelf.
#[derive(Debug, Error)]
pub enum ShelfError {
    // Binary format errors
    #[error("Malformed shortcut store at byte {offset}: {message}")]
    Format { message: String, offset: usize },

    // Catalog errors
    #[error("Shortcut not found: {id}")]
    NotFound { id: String },

    #[error("Shortcut already exists: {id}")]
    AlreadyExists { id: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A failure annotated with the operation that was running.
    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<ShelfError>,
    },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for deckshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

impl From<std::io::Error> for ShelfError {
    fn from(err: std::io::Error) -> Self {
        ShelfError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        ShelfError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for ShelfError {
    fn from(err: reqwest::Error) -> Self {
        ShelfError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl ShelfError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ShelfError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a format error at the given byte offset.
    pub fn format(message: impl Into<String>, offset: usize) -> Self {
        ShelfError::Format {
            message: message.into(),
            offset,
        }
    }

    /// Wrap this error with the name of the operation that produced it.
    ///
    /// Already-wrapped errors keep their innermost operation name.
    pub fn in_operation(self, operation: &'static str) -> Self {
        match self {
            ShelfError::Operation { .. } => self,
            other => ShelfError::Operation {
                operation,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, looking through operation wrappers.
    pub fn root(&self) -> &ShelfError {
        match self {
            ShelfError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if re-running the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            ShelfError::Io { .. } | ShelfError::Network { .. } | ShelfError::DownloadFailed { .. }
        )
    }
}

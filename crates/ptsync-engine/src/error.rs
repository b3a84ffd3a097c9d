//! Error types for the document model and store
//!
//! These are the engine's only fatal conditions: a document that cannot be
//! read, parsed, or written stops the run. Everything inside reconciliation
//! is a logged skip instead.

use std::path::PathBuf;

/// Errors converting between the generic nested mapping and the typed
/// document mirror
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The mapping does not have the expected top-level shape
    #[error("malformed tracking document: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The document could not be re-serialized
    #[error("document serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors at the document file boundary
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error during read, write, or backup
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid document mirror
    #[error("malformed tracking document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document-level conversion error
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create JSON error for path
    pub fn json_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
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
    fn store_error_display() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StoreError::io_error("/tmp/ProjectProgress.json", source);
        assert!(err.to_string().contains("/tmp/ProjectProgress.json"));
    }
}

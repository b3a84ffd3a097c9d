//! Error types for report ingestion
//!
//! Everything here is fatal at the driver: a report that cannot be
//! identified or parsed stops the run before any document mutation.

use std::path::PathBuf;

/// Errors while resolving or loading a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report path does not carry the expected `.json` extension
    #[error("report file {} does not have a .json extension", .0.display())]
    MissingJsonExtension(PathBuf),

    /// Filename stem does not split into `<project>-<quarter>-<year>`
    #[error("cannot determine [project, quarter, year] from '{name}'")]
    MalformedIdentifier { name: String },

    /// Quarter component outside Q1..Q4
    #[error("'{0}' is not one of (Q1, Q2, Q3, Q4)")]
    InvalidQuarter(String),

    /// Timestamp that does not parse as ISO 8601
    #[error("invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// IO error during report read or write
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report content is not the expected JSON shape
    #[error("malformed report {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ReportError {
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

    /// Create malformed-identifier error for a filename stem
    pub fn malformed_identifier(name: impl Into<String>) -> Self {
        Self::MalformedIdentifier { name: name.into() }
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_identifier_display() {
        let err = ReportError::malformed_identifier("MEP-2020");
        assert_eq!(
            err.to_string(),
            "cannot determine [project, quarter, year] from 'MEP-2020'"
        );
    }

    #[test]
    fn invalid_quarter_display() {
        let err = ReportError::InvalidQuarter("25%".to_string());
        assert_eq!(err.to_string(), "'25%' is not one of (Q1, Q2, Q3, Q4)");
    }
}

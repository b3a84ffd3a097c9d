//! Document file boundary
//!
//! The engine never opens storage itself; this store is the narrow
//! collaborator that does. It works on the document's JSON mirror (the
//! generic nested mapping the external tree parser produces) and takes a
//! whole-file backup copy before any write, which is the run's only
//! rollback mechanism.

use crate::document::ProgressDocument;
use crate::error::StoreError;
use std::path::{Path, PathBuf};

/// Load, save, and backup for the tracking document's JSON mirror.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentStore;

impl DocumentStore {
    /// Create a store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load and normalize a document
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ProgressDocument, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::io_error(path, e))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::json_error(path, e))
    }

    /// Write the document back with two-space indentation
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        document: &ProgressDocument,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();
        let mut json = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::json_error(path, e))?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| StoreError::io_error(path, e))
    }

    /// Copy the document to `<path>.bak` alongside the original
    ///
    /// Returns the backup path. Must run before the first mutation.
    pub fn backup(&self, path: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let path = path.as_ref();
        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);
        std::fs::copy(path, &backup).map_err(|e| StoreError::io_error(path, e))?;
        Ok(backup)
    }
}

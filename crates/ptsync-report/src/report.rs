//! The persisted completion report
//!
//! Top-level mapping from 3-letter book code to an ordered list of
//! single-key objects, each key a phase, each value a [`PhaseFact`]:
//!
//! ```json
//! {
//!   "MRK": [
//!     { "exegesis": { "startingChapter": 1, "chapters": 16,
//!                     "quarter": "Q4", "year": 2020 } }
//!   ]
//! }
//! ```
//!
//! Book order and row order are preserved; when a book is split across
//! several planning rows, each row's starting chapter depends on the
//! previous row's chapter count, so order is load-bearing.
//!
//! Entry keys stay strings so an unknown phase key is a reconcile-time
//! skip, not a parse failure.

use crate::error::ReportError;
use crate::quarter::Quarter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Completion of part of a book in one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseFact {
    /// Starting chapter of the unit of work
    pub starting_chapter: u32,
    /// Completed chapters in the unit
    pub chapters: u32,
    /// Calendar quarter the chapters were completed in
    pub quarter: Quarter,
    /// Year the chapters were completed in
    pub year: i32,
}

/// One report row: phase key → completion fact (normally a single entry).
pub type FactRow = IndexMap<String, PhaseFact>;

/// A full project completion report, book code → ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectReport {
    books: IndexMap<String, Vec<FactRow>>,
}

impl ProjectReport {
    /// Create an empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a report from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ReportError::io_error(path, e))?;
        serde_json::from_str(&raw).map_err(|e| ReportError::json_error(path, e))
    }

    /// Save the report as two-space-indented JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if path.exists() {
            tracing::warn!("overwriting status file: {}", path.display());
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::json_error(path, e))?;
        std::fs::write(path, json).map_err(|e| ReportError::io_error(path, e))
    }

    /// Append rows for a book, preserving row order
    pub fn append(&mut self, code: impl Into<String>, rows: Vec<FactRow>) {
        if rows.is_empty() {
            return;
        }
        self.books.entry(code.into()).or_default().extend(rows);
    }

    /// Rows recorded for a book code
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&[FactRow]> {
        self.books.get(code).map(Vec::as_slice)
    }

    /// Iterate books in report order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FactRow])> {
        self.books.iter().map(|(code, rows)| (code.as_str(), rows.as_slice()))
    }

    /// Keep only facts reported for the given calendar quarter
    ///
    /// Rows and books left with no facts are dropped.
    pub fn retain_quarter(&mut self, quarter: Quarter) {
        for rows in self.books.values_mut() {
            for row in rows.iter_mut() {
                row.retain(|_, fact| fact.quarter == quarter);
            }
            rows.retain(|row| !row.is_empty());
        }
        self.books.retain(|_, rows| !rows.is_empty());
    }

    /// Number of books in the report
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the report has no books
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

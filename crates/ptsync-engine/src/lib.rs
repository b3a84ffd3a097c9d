//! Progress reconciliation engine
//!
//! Merges a quarterly completion report into a project's progress-tracking
//! document without ever downgrading completed work or duplicating entries.
//!
//! # Core Concepts
//!
//! - [`ProgressDocument`]: in-memory mirror of the tracking file's tag
//!   structure, normalized to sequences at load
//! - [`DocumentStore`]: the narrow file boundary (load / save / backup)
//! - [`Reconciler`]: walks a [`ptsync_report::ProjectReport`] and merges
//!   completion facts into the document, append/update-only
//! - [`ReconcileSummary`]: what one run did
//!
//! The engine owns the document only between load and save; anomalies in
//! the document are logged and skipped at the smallest granularity, never
//! fatal.

mod document;
mod error;
mod reconcile;
mod store;

pub use document::{
    Assignment, ProgressDocument, ProgressInfo, Stage, Stages, StatusRecord, Task,
    STAGE_COUNT,
};
pub use error::{DocumentError, StoreError};
pub use reconcile::{ReconcileSummary, Reconciler};
pub use store::DocumentStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

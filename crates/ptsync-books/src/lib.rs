//! Book reference data for progress reconciliation
//!
//! Provides the static table mapping 3-letter book codes to the numbering,
//! chapter counts, and verse counts used by the tracking document.
//!
//! # Core Concepts
//!
//! - [`BookInfo`]: one book's reference data (code, name, number, counts)
//! - [`BookRegistry`]: lookup surface over the static table
//!
//! A failed lookup is a skippable condition for callers, never a crash.

mod registry;

pub use registry::{BookInfo, BookRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

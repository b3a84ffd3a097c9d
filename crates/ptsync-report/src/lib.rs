//! Report vocabulary and ingestion for progress reconciliation
//!
//! Everything between the raw quarterly report and the reconciliation
//! engine:
//!
//! - [`Phase`]: the six translation phases and their stage indexes
//! - [`Quarter`] / [`QuarterToken`]: fiscal quarters and the percentage
//!   pseudo-quarters planning sheets use
//! - [`ReportingContext`]: project / quarter / year identity and the
//!   deterministic reporting date
//! - [`completed_chapters`]: the chapter-completion calculator
//! - [`ProjectReport`]: the persisted report format (book code → ordered
//!   list of per-phase completion facts)
//! - [`SheetRow`] / [`report_from_rows`]: the adapter from extracted
//!   planning-sheet rows to a [`ProjectReport`]

mod calculator;
mod error;
mod phase;
mod quarter;
mod report;
mod reporting;
mod sheet;

pub use calculator::{chapters_from_verses, completed_chapters};
pub use error::{ReportError, ReportResult};
pub use phase::Phase;
pub use quarter::{Percent, Quarter, QuarterToken};
pub use report::{FactRow, PhaseFact, ProjectReport};
pub use reporting::{fiscal_quarter_of, fiscal_year_of, reporting_date, ReportingContext};
pub use sheet::{load_rows, report_from_rows, SheetRow, END_OF_BOOKS_MARKER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

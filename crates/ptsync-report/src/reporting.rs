//! Reporting context and the deterministic reporting date
//!
//! A report is identified by the triple (project name, quarter, year),
//! parsed from its filename stem or from sheet metadata cells. Every record
//! the run stamps gets a *reporting date* derived from a quarter/year pair,
//! never from the wall clock, so output is reproducible.

use crate::error::ReportError;
use crate::quarter::Quarter;
use chrono::{DateTime, Datelike};
use std::path::Path;

/// Fixed arbitrary time-of-day for reporting dates.
const REPORTING_TIME: &str = "09:19:56.0972475+07:00";

/// Build the reporting date for a quarter/year pair
///
/// Always the 28th of the quarter's reporting month, e.g. Q4 2020 →
/// `2020-09-28T09:19:56.0972475+07:00`.
#[must_use]
pub fn reporting_date(quarter: Quarter, year: i32) -> String {
    format!("{year}-{}-28T{REPORTING_TIME}", quarter.reporting_month())
}

/// Fiscal reporting quarter of an ISO 8601 timestamp
///
/// Oct-Dec = Q1, Jan-Mar = Q2, Apr-Jun = Q3, Jul-Sep = Q4.
pub fn fiscal_quarter_of(timestamp: &str) -> Result<Quarter, ReportError> {
    let date = parse_timestamp(timestamp)?;
    Ok(match date.month() {
        10..=12 => Quarter::Q1,
        1..=3 => Quarter::Q2,
        4..=6 => Quarter::Q3,
        _ => Quarter::Q4,
    })
}

/// Fiscal reporting year of an ISO 8601 timestamp
///
/// Oct-Dec belongs to Q1 of the fiscal year labeled by the previous
/// calendar year.
pub fn fiscal_year_of(timestamp: &str) -> Result<i32, ReportError> {
    let date = parse_timestamp(timestamp)?;
    Ok(if date.month() >= 10 {
        date.year() - 1
    } else {
        date.year()
    })
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<chrono::FixedOffset>, ReportError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map_err(|_| ReportError::InvalidTimestamp(timestamp.to_string()))
}

/// Identity of one quarterly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingContext {
    /// Project name, from the report filename or sheet metadata
    pub project_name: String,
    /// Calendar reporting quarter (never a percentage)
    pub quarter: Quarter,
    /// 4-digit reporting year
    pub year: i32,
}

impl ReportingContext {
    /// Create a context from already-validated parts
    #[must_use]
    pub fn new(project_name: impl Into<String>, quarter: Quarter, year: i32) -> Self {
        Self {
            project_name: project_name.into(),
            quarter,
            year,
        }
    }

    /// Resolve a context from a report path
    ///
    /// The filename must be `<project>-<quarter>-<year>.json`, e.g.
    /// `MEP-Q2-2020.json`.
    pub fn from_report_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            return Err(ReportError::MissingJsonExtension(path.to_path_buf()));
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ReportError::malformed_identifier(path.display().to_string()))?;
        Self::from_stem(stem)
    }

    /// Resolve a context from a filename stem `<project>-<quarter>-<year>`
    pub fn from_stem(stem: &str) -> Result<Self, ReportError> {
        let components: Vec<&str> = stem.split('-').collect();
        let &[project, quarter, year] = components.as_slice() else {
            return Err(ReportError::malformed_identifier(stem));
        };
        if project.is_empty() {
            return Err(ReportError::malformed_identifier(stem));
        }
        let quarter: Quarter = quarter.parse()?;
        let year: i32 = year
            .parse()
            .map_err(|_| ReportError::malformed_identifier(stem))?;
        Ok(Self::new(project, quarter, year))
    }

    /// Resolve a context from sheet metadata cells
    ///
    /// The project title cell must be non-blank and the quarter cell a
    /// calendar quarter.
    pub fn from_metadata(
        project_title: &str,
        quarter: &str,
        year: &str,
    ) -> Result<Self, ReportError> {
        let title = project_title.trim();
        if title.is_empty() {
            return Err(ReportError::malformed_identifier("<blank project title>"));
        }
        let quarter: Quarter = quarter.parse()?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| ReportError::malformed_identifier(year))?;
        Ok(Self::new(title, quarter, year))
    }

    /// The reporting date for this context's quarter and year
    #[must_use]
    pub fn reporting_date(&self) -> String {
        reporting_date(self.quarter, self.year)
    }

    /// Canonical report filename for this context
    #[must_use]
    pub fn report_filename(&self) -> String {
        format!("{}-{}-{}.json", self.project_name, self.quarter, self.year)
    }
}

//! Adapter from extracted planning-sheet rows to a [`ProjectReport`]
//!
//! Cell extraction itself is an external collaborator; it hands over rows
//! keyed by column (`bookName`, `verses`, and a quarter/year cell pair per
//! phase), typically as a JSON dump. This module turns those rows into the
//! report shape the reconciliation engine consumes.
//!
//! Rows must be processed in file order: when consecutive rows describe the
//! same book, the second row's starting chapter is offset by the first
//! row's unit size.

use crate::calculator::{chapters_from_verses, completed_chapters};
use crate::error::ReportError;
use crate::phase::Phase;
use crate::quarter::QuarterToken;
use crate::report::{FactRow, ProjectReport};
use crate::reporting::ReportingContext;
use ptsync_books::{BookInfo, BookRegistry};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Book-name cell that marks the end of the progress rows.
pub const END_OF_BOOKS_MARKER: &str = "Other Goals and Milestones";

/// One extracted row of the progress sheet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetRow {
    /// English book name, blank for spacer rows
    pub book_name: Option<String>,
    /// Completed verses for this unit of work, when the plan splits a book
    pub verses: Option<u32>,
    /// Exegesis & first draft quarter cell
    pub exegesis_quarter: Option<QuarterToken>,
    /// Exegesis & first draft year cell
    pub exegesis_year: Option<i32>,
    /// Team checking quarter cell
    pub team_quarter: Option<QuarterToken>,
    /// Team checking year cell
    pub team_year: Option<i32>,
    /// Advisor check quarter cell
    pub advisor_quarter: Option<QuarterToken>,
    /// Advisor check year cell
    pub advisor_year: Option<i32>,
    /// Community testing quarter cell
    pub community_quarter: Option<QuarterToken>,
    /// Community testing year cell
    pub community_year: Option<i32>,
    /// Consultant check quarter cell
    pub consultant_quarter: Option<QuarterToken>,
    /// Consultant check year cell
    pub consultant_year: Option<i32>,
    /// Publish quarter cell
    pub publish_quarter: Option<QuarterToken>,
    /// Publish year cell
    pub publish_year: Option<i32>,
}

impl SheetRow {
    /// The six phase cell pairs of this row, in stage order
    fn phase_cells(&self) -> [(Phase, Option<QuarterToken>, Option<i32>); 6] {
        [
            (Phase::Exegesis, self.exegesis_quarter, self.exegesis_year),
            (Phase::Team, self.team_quarter, self.team_year),
            (Phase::Advisor, self.advisor_quarter, self.advisor_year),
            (Phase::Community, self.community_quarter, self.community_year),
            (Phase::Consultant, self.consultant_quarter, self.consultant_year),
            (Phase::Publish, self.publish_quarter, self.publish_year),
        ]
    }
}

/// Load extracted sheet rows from a JSON dump
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<SheetRow>, ReportError> {
    let path = path.as_ref();
    let raw =
        std::fs::read_to_string(path).map_err(|e| ReportError::io_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| ReportError::json_error(path, e))
}

// Carried between consecutive rows for the starting-chapter offset.
struct PrevRow {
    name: String,
    starting_chapter: u32,
    chapters_for_unit: Option<u32>,
}

/// Derive a [`ProjectReport`] from extracted sheet rows
///
/// Rows after the [`END_OF_BOOKS_MARKER`] are ignored; rows without a
/// recognizable book name are skipped. A phase cell with a quarter but no
/// year is warned about and skipped entirely.
#[must_use]
pub fn report_from_rows(
    rows: &[SheetRow],
    context: &ReportingContext,
    registry: &BookRegistry,
) -> ProjectReport {
    let mut report = ProjectReport::new();
    let mut prev: Option<PrevRow> = None;

    for row in rows {
        let Some(name) = row.book_name.as_deref().filter(|n| !n.is_empty()) else {
            prev = None;
            continue;
        };
        if name == END_OF_BOOKS_MARKER {
            break;
        }
        let Some(book) = registry.lookup_by_name(name) else {
            warn!("book name '{name}' not found, skipping row");
            prev = None;
            continue;
        };

        let chapters_for_unit = row
            .verses
            .filter(|&v| v > 0)
            .map(|v| chapters_from_verses(v, book.verses, book.chapters));

        // Same book as the immediately previous row: this unit starts where
        // the previous one ended.
        let mut starting_chapter = 1;
        if chapters_for_unit.is_some() {
            if let Some(p) = prev.as_ref().filter(|p| p.name == name) {
                if let Some(prev_unit) = p.chapters_for_unit {
                    starting_chapter = p.starting_chapter + prev_unit;
                }
            }
        }

        let facts = parse_row_status(row, book, starting_chapter, context);
        report.append(book.code, facts);

        prev = Some(PrevRow {
            name: name.to_string(),
            starting_chapter,
            chapters_for_unit,
        });
    }

    report
}

// One FactRow per phase that has status, matching the persisted format's
// list of single-key objects.
fn parse_row_status(
    row: &SheetRow,
    book: &BookInfo,
    starting_chapter: u32,
    context: &ReportingContext,
) -> Vec<FactRow> {
    let mut facts = Vec::new();
    for (phase, quarter_cell, year_cell) in row.phase_cells() {
        let Some(token) = quarter_cell else { continue };
        let Some(year) = year_cell else {
            warn!(
                "{} ({}) year empty",
                book.name,
                phase.display_name()
            );
            continue;
        };
        let fact =
            completed_chapters(book, starting_chapter, token, year, row.verses, context);
        let mut entry = FactRow::new();
        entry.insert(phase.key().to_string(), fact);
        facts.push(entry);
    }
    facts
}

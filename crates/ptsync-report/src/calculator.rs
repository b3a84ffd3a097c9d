//! Chapter-completion calculator
//!
//! Turns one phase cell of a planning row into a [`PhaseFact`]. Percentage
//! quarters resolve against the report's own quarter; verse counts scale
//! the unit down to a proportional chapter count. Rounding means a book's
//! row-by-row sums will not necessarily reach its total chapter count;
//! that imprecision is accepted, not corrected.

use crate::quarter::QuarterToken;
use crate::report::PhaseFact;
use crate::reporting::ReportingContext;
use ptsync_books::BookInfo;

/// Proportion of a book's chapters covered by a verse count
///
/// `round(chapters_in_book * verses / total_verses)`; a zero total verse
/// count falls back to the whole book.
#[must_use]
pub fn chapters_from_verses(verses: u32, total_verses: u32, chapters_in_book: u32) -> u32 {
    if total_verses == 0 {
        return chapters_in_book;
    }
    let proportion =
        f64::from(chapters_in_book) * f64::from(verses) / f64::from(total_verses);
    proportion.round() as u32
}

/// Completed chapters for one (book, phase) cell of a planning row
///
/// - `verses` present and the book's verse total known: the unit covers the
///   proportional chapter count; otherwise the whole book.
/// - Percentage token: the effective quarter is the report's own, and the
///   completed count is the rounded fraction of the unit.
/// - Calendar token: used verbatim, the whole unit is complete.
///
/// `starting_chapter` passes through unchanged so downstream identifier
/// generation can offset correctly.
#[must_use]
pub fn completed_chapters(
    book: &BookInfo,
    starting_chapter: u32,
    token: QuarterToken,
    year: i32,
    verses: Option<u32>,
    context: &ReportingContext,
) -> PhaseFact {
    let chapters_for_unit = verses
        .filter(|&v| v > 0)
        .map_or(book.chapters, |v| {
            chapters_from_verses(v, book.verses, book.chapters)
        });

    let (quarter, chapters) = match token {
        QuarterToken::Percent(pct) => {
            let completed = (f64::from(chapters_for_unit) * pct.fraction()).round() as u32;
            (context.quarter, completed)
        }
        QuarterToken::Calendar(quarter) => (quarter, chapters_for_unit),
    };

    PhaseFact {
        starting_chapter,
        chapters,
        quarter,
        year,
    }
}

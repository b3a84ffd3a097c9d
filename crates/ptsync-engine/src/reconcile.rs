//! The reconciliation engine
//!
//! Walks every (book, phase) completion fact in a report and merges it into
//! the tracking document: the book is assigned in the phase's stage, and
//! every chapter in the completed range gets a status record marked done.
//!
//! The merge is append/update-only. A record that is already done is never
//! touched again, so re-running the same report is a no-op and a later
//! report can never downgrade or re-attribute earlier work.
//!
//! Anomalies (unknown phase or book, missing containers) are warned about
//! and skipped at the granularity of a single fact; the run continues and
//! keeps whatever merged cleanly.

use crate::document::{Assignment, ProgressDocument, StatusRecord};
use ptsync_books::{BookInfo, BookRegistry};
use ptsync_report::{reporting_date, Phase, PhaseFact, ProjectReport};
use tracing::warn;

/// What one reconciliation run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Status records created (always created done)
    pub records_added: usize,
    /// Records flipped from pending to done
    pub records_updated: usize,
    /// Records already done, left untouched
    pub records_unchanged: usize,
    /// Assignment entries created
    pub assignments_added: usize,
    /// Facts skipped because of an anomaly
    pub facts_skipped: usize,
}

/// Merges completion reports into a progress document.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    books: &'a BookRegistry,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over the given book registry
    #[inline]
    #[must_use]
    pub fn new(books: &'a BookRegistry) -> Self {
        Self { books }
    }

    /// Merge every fact of `report` into `document`, in report order
    ///
    /// New and updated records are attributed to `user` with the fact's own
    /// reporting date. The document is mutated in place; nothing is ever
    /// removed from it.
    pub fn reconcile(
        &self,
        report: &ProjectReport,
        document: &mut ProgressDocument,
        user: &str,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for (code, rows) in report.iter() {
            for row in rows {
                for (phase_key, fact) in row {
                    self.apply_fact(code, phase_key, fact, document, user, &mut summary);
                }
            }
        }
        summary
    }

    fn apply_fact(
        &self,
        code: &str,
        phase_key: &str,
        fact: &PhaseFact,
        document: &mut ProgressDocument,
        user: &str,
        summary: &mut ReconcileSummary,
    ) {
        let Some(phase) = Phase::parse(phase_key) else {
            warn!("unknown phase '{phase_key}' for {code}, skipping");
            summary.facts_skipped += 1;
            return;
        };
        let Some(book) = self.books.lookup(code) else {
            warn!("book code {code} not found, skipping");
            summary.facts_skipped += 1;
            return;
        };

        let stage_index = phase.stage_index();
        let Some(task) = document
            .stage_mut(stage_index)
            .and_then(|stage| stage.task_mut())
        else {
            warn!(
                "no task at stage {stage_index} ({}), skipping {code}",
                phase.display_name()
            );
            summary.facts_skipped += 1;
            return;
        };

        // The engine has no authority over the wider document layout: a
        // missing container is skipped, not fabricated.
        let Some(assignments) = task.assignments.as_mut() else {
            warn!(
                "error updating assignments for {code} in {}, skipping",
                phase.display_name()
            );
            summary.facts_skipped += 1;
            return;
        };
        if !assignments.iter().any(|a| a.book == code) {
            assignments.push(Assignment::new(code));
            summary.assignments_added += 1;
        }

        let Some(status) = task.status.as_mut() else {
            warn!(
                "error updating status for {code} in {}, skipping",
                phase.display_name()
            );
            summary.facts_skipped += 1;
            return;
        };

        let date = reporting_date(fact.quarter, fact.year);
        if phase == Phase::Publish {
            // Publish tracks whole-book completion under chapter 0
            if fact.chapters > 0 {
                mark_done(status, chapter_key(book, 0), user, &date, summary);
            }
        } else {
            for ch in fact.starting_chapter..fact.starting_chapter + fact.chapters {
                mark_done(status, chapter_key(book, ch), user, &date, summary);
            }
        }
    }
}

/// Composite chapter identifier for a known book
fn chapter_key(book: &BookInfo, chapter: u32) -> String {
    format!("{}-{chapter}", book.number)
}

fn mark_done(
    status: &mut Vec<StatusRecord>,
    key: String,
    user: &str,
    date: &str,
    summary: &mut ReconcileSummary,
) {
    if let Some(record) = status.iter_mut().find(|r| r.book_chapter == key) {
        if record.done {
            // No-regression: never re-attribute completed work
            summary.records_unchanged += 1;
        } else {
            record.done = true;
            record.user = user.to_string();
            record.date = date.to_string();
            summary.records_updated += 1;
        }
    } else {
        status.push(StatusRecord::completed(key, user, date));
        summary.records_added += 1;
    }
}

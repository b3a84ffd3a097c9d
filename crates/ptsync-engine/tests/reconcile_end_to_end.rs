//! End-to-end reconciliation against a realistic document mirror

use ptsync_books::BookRegistry;
use ptsync_engine::{ProgressDocument, Reconciler, StatusRecord};
use ptsync_report::ProjectReport;
use serde_json::json;

fn empty_document() -> ProgressDocument {
    ProgressDocument::from_value(json!({
        "ProgressInfo": {
            "Stages": {
                "Stage": (0..6).map(|_| json!({
                    "Task": { "Assignments": [], "Status": [] }
                })).collect::<Vec<_>>()
            }
        }
    }))
    .unwrap()
}

fn report(raw: &str) -> ProjectReport {
    serde_json::from_str(raw).unwrap()
}

fn status_of<'d>(doc: &'d ProgressDocument, stage: usize) -> &'d [StatusRecord] {
    doc.stage(stage)
        .unwrap()
        .task()
        .unwrap()
        .status
        .as_deref()
        .unwrap()
}

#[test]
fn marks_a_whole_book_drafted() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let report = report(
        r#"{ "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 16,
                                      "quarter": "Q4", "year": 2020 } } ] }"#,
    );

    let summary = Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");
    assert_eq!(summary.records_added, 16);
    assert_eq!(summary.assignments_added, 1);
    assert_eq!(summary.facts_skipped, 0);

    // Stage 0 holds the drafting phase
    let status = status_of(&doc, 0);
    assert_eq!(status.len(), 16);
    for (i, record) in status.iter().enumerate() {
        assert_eq!(record.book_chapter, format!("41-{}", i + 1));
        assert!(record.done);
        assert_eq!(record.user, "tester");
        assert_eq!(record.date, "2020-09-28T09:19:56.0972475+07:00");
    }

    // The other stages stay empty
    for stage in 1..6 {
        assert!(status_of(&doc, stage).is_empty());
    }
}

#[test]
fn reconcile_is_idempotent() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let report = report(
        r#"{ "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 16,
                                      "quarter": "Q4", "year": 2020 } } ] }"#,
    );
    let reconciler = Reconciler::new(&registry);

    reconciler.reconcile(&report, &mut doc, "tester");
    let after_first = doc.clone();

    let second = reconciler.reconcile(&report, &mut doc, "tester");
    assert_eq!(doc, after_first);
    assert_eq!(second.records_added, 0);
    assert_eq!(second.records_updated, 0);
    assert_eq!(second.records_unchanged, 16);
    assert_eq!(second.assignments_added, 0);
}

#[test]
fn completed_records_are_never_reattributed() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let reconciler = Reconciler::new(&registry);

    let q4 = report(
        r#"{ "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 16,
                                      "quarter": "Q4", "year": 2020 } } ] }"#,
    );
    reconciler.reconcile(&q4, &mut doc, "first-user");

    // A later report covering the same chapters under another user and date
    let q1 = report(
        r#"{ "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 16,
                                      "quarter": "Q1", "year": 2021 } } ] }"#,
    );
    let summary = reconciler.reconcile(&q1, &mut doc, "second-user");
    assert_eq!(summary.records_unchanged, 16);

    for record in status_of(&doc, 0) {
        assert_eq!(record.user, "first-user");
        assert_eq!(record.date, "2020-09-28T09:19:56.0972475+07:00");
    }
}

#[test]
fn exactly_the_completed_range_is_marked() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let report = report(
        r#"{ "MRK": [ { "team": { "startingChapter": 3, "chapters": 4,
                                  "quarter": "Q2", "year": 2021 } } ] }"#,
    );

    Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");

    let keys: Vec<&str> = status_of(&doc, 1)
        .iter()
        .map(|r| r.book_chapter.as_str())
        .collect();
    assert_eq!(keys, vec!["41-3", "41-4", "41-5", "41-6"]);
}

#[test]
fn chapter_keys_use_the_canonical_book_numbers() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let report = report(
        r#"{
            "GEN": [ { "exegesis": { "startingChapter": 50, "chapters": 1,
                                     "quarter": "Q1", "year": 2021 } } ],
            "MAL": [ { "exegesis": { "startingChapter": 4, "chapters": 1,
                                     "quarter": "Q1", "year": 2021 } } ],
            "MAT": [ { "exegesis": { "startingChapter": 28, "chapters": 1,
                                     "quarter": "Q1", "year": 2021 } } ],
            "REV": [ { "exegesis": { "startingChapter": 22, "chapters": 1,
                                     "quarter": "Q1", "year": 2021 } } ]
        }"#,
    );

    Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");

    let keys: Vec<&str> = status_of(&doc, 0)
        .iter()
        .map(|r| r.book_chapter.as_str())
        .collect();
    assert_eq!(keys, vec!["1-50", "39-4", "40-28", "66-22"]);
}

#[test]
fn unknown_book_skips_without_aborting_the_run() {
    let registry = BookRegistry::new();
    let mut doc = empty_document();
    let report = report(
        r#"{
            "XXX": [ { "exegesis": { "startingChapter": 1, "chapters": 10,
                                     "quarter": "Q4", "year": 2020 } } ],
            "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 16,
                                     "quarter": "Q4", "year": 2020 } } ]
        }"#,
    );

    let summary = Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");
    assert_eq!(summary.facts_skipped, 1);
    assert_eq!(summary.records_added, 16);

    // Nothing for the unknown code, everything for the known one
    let status = status_of(&doc, 0);
    assert!(status.iter().all(|r| r.book_chapter.starts_with("41-")));
}

#[test]
fn works_on_a_collapsed_single_stage_document() {
    // A document whose stage, task, and status tags collapsed to objects
    let registry = BookRegistry::new();
    let mut doc = ProgressDocument::from_value(json!({
        "ProgressInfo": {
            "Stages": {
                "Stage": [
                    {
                        "Task": {
                            "Assignments": { "book": "LUK" },
                            "Status": {
                                "bookChapter": "41-1",
                                "done": "false",
                                "user": "earlier",
                                "date": "2019-12-28T09:19:56.0972475+07:00"
                            }
                        }
                    },
                    { "Task": { "Assignments": [], "Status": [] } },
                    { "Task": { "Assignments": [], "Status": [] } },
                    { "Task": { "Assignments": [], "Status": [] } },
                    { "Task": { "Assignments": [], "Status": [] } },
                    { "Task": { "Assignments": [], "Status": [] } }
                ]
            }
        }
    }))
    .unwrap();

    let report = report(
        r#"{ "MRK": [ { "exegesis": { "startingChapter": 1, "chapters": 2,
                                      "quarter": "Q4", "year": 2020 } } ] }"#,
    );
    let summary = Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");

    // The collapsed pending record is promoted, the second chapter appended
    assert_eq!(summary.records_updated, 1);
    assert_eq!(summary.records_added, 1);

    let status = status_of(&doc, 0);
    assert_eq!(status.len(), 2);
    assert!(status.iter().all(|r| r.done));

    // And the pre-existing assignment was kept alongside the new one
    let assignments = doc
        .stage(0)
        .unwrap()
        .task()
        .unwrap()
        .assignments
        .as_deref()
        .unwrap();
    let books: Vec<&str> = assignments.iter().map(|a| a.book.as_str()).collect();
    assert_eq!(books, vec!["LUK", "MRK"]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_reconcile_twice_equals_once(
            start in 1u32..=30,
            chapters in 0u32..=20,
        ) {
            let registry = BookRegistry::new();
            let mut doc = empty_document();
            let raw = format!(
                r#"{{ "MRK": [ {{ "team": {{ "startingChapter": {start},
                    "chapters": {chapters}, "quarter": "Q2", "year": 2021 }} }} ] }}"#
            );
            let report = report(&raw);
            let reconciler = Reconciler::new(&registry);

            reconciler.reconcile(&report, &mut doc, "tester");
            let after_first = doc.clone();
            reconciler.reconcile(&report, &mut doc, "tester");
            prop_assert_eq!(&doc, &after_first);
        }

        #[test]
        fn prop_exactly_the_range_is_present(
            start in 1u32..=30,
            chapters in 0u32..=20,
        ) {
            let registry = BookRegistry::new();
            let mut doc = empty_document();
            let raw = format!(
                r#"{{ "MRK": [ {{ "team": {{ "startingChapter": {start},
                    "chapters": {chapters}, "quarter": "Q2", "year": 2021 }} }} ] }}"#
            );
            let report = report(&raw);

            Reconciler::new(&registry).reconcile(&report, &mut doc, "tester");

            let expected: Vec<String> =
                (start..start + chapters).map(|ch| format!("41-{ch}")).collect();
            let actual: Vec<String> = status_of(&doc, 1)
                .iter()
                .map(|r| r.book_chapter.clone())
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}

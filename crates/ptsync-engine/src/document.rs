//! In-memory mirror of the progress-tracking document
//!
//! The external tree parser hands the document over as a generic nested
//! mapping with the fixed shape
//! `ProgressInfo.Stages.Stage[0..5].Task.{Assignments[],Status[]}`.
//!
//! Source serialization is heterogeneous: a tag with exactly one child may
//! arrive as a single object instead of a list. All mutable collections
//! (and, defensively, `Task`) are normalized to sequences here, once, at
//! deserialization time, so no access site needs its own cardinality check.
//!
//! Tags the engine does not own are carried in flattened extras maps and
//! survive the round trip untouched.

use crate::error::DocumentError;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Number of stages in the document's fixed phase ordering.
pub const STAGE_COUNT: usize = 6;

/// Whole tracking document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDocument {
    /// The progress tree
    #[serde(rename = "ProgressInfo")]
    pub progress_info: ProgressInfo,
    /// Sibling tags outside the progress tree
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ProgressInfo` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// The stage list container
    #[serde(rename = "Stages")]
    pub stages: Stages,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Stages` container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stages {
    /// One stage per phase, in canonical order
    #[serde(rename = "Stage", deserialize_with = "one_or_many")]
    pub stage: Vec<Stage>,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `Stage` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// The stage's tasks; the engine works on the first
    #[serde(
        rename = "Task",
        default,
        deserialize_with = "one_or_many_or_absent",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub task: Vec<Task>,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `Task` node, owning the assignment and status containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Books assigned in this stage; absent is a structural anomaly
    #[serde(
        rename = "Assignments",
        default,
        deserialize_with = "opt_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignments: Option<Vec<Assignment>>,
    /// Per-chapter status records; absent is a structural anomaly
    #[serde(
        rename = "Status",
        default,
        deserialize_with = "opt_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Vec<StatusRecord>>,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `Assignments` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// 3-letter book code
    pub book: String,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `Status` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Composite chapter identifier `"<book number>-<chapter>"`
    #[serde(rename = "bookChapter")]
    pub book_chapter: String,
    /// Completion flag; the document spells it as a string
    #[serde(
        default,
        deserialize_with = "string_or_bool",
        serialize_with = "bool_as_string"
    )]
    pub done: bool,
    /// User who last marked the chapter
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Reporting date of the last mark
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    /// Tags the engine does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProgressDocument {
    /// Build the typed mirror from a generic nested mapping
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        serde_json::from_value(value).map_err(DocumentError::Malformed)
    }

    /// Convert back to the generic nested mapping
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(self).map_err(DocumentError::Serialize)
    }

    /// Stage at the given index, if the document has one
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.progress_info.stages.stage.get(index)
    }

    /// Mutable stage at the given index
    #[must_use]
    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Stage> {
        self.progress_info.stages.stage.get_mut(index)
    }

    /// Number of stages the document actually carries
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.progress_info.stages.stage.len()
    }
}

impl Stage {
    /// The stage's task, if it has one
    #[must_use]
    pub fn task(&self) -> Option<&Task> {
        self.task.first()
    }

    /// Mutable access to the stage's task
    #[must_use]
    pub fn task_mut(&mut self) -> Option<&mut Task> {
        self.task.first_mut()
    }
}

impl Task {
    /// Whether a book is already assigned in this task
    #[must_use]
    pub fn has_assignment(&self, book: &str) -> bool {
        self.assignments
            .as_deref()
            .is_some_and(|a| a.iter().any(|entry| entry.book == book))
    }
}

impl Assignment {
    /// Assignment for a book code (book code only, no other fields)
    #[must_use]
    pub fn new(book: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            extra: Map::new(),
        }
    }
}

impl StatusRecord {
    /// A freshly completed record
    #[must_use]
    pub fn completed(
        book_chapter: impl Into<String>,
        user: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            book_chapter: book_chapter.into(),
            done: true,
            user: user.into(),
            date: date.into(),
            extra: Map::new(),
        }
    }
}

// A tag with one child deserializes as a single object; normalize to a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    OneOrMany::deserialize(deserializer).map(Into::into)
}

fn one_or_many_or_absent<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<OneOrMany<T>>::deserialize(deserializer)
        .map(|value| value.map(Into::into).unwrap_or_default())
}

fn opt_one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<OneOrMany<T>>::deserialize(deserializer).map(|value| value.map(Into::into))
}

struct DoneVisitor;

impl Visitor<'_> for DoneVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a boolean or the strings \"true\"/\"false\"")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
        Ok(value == "true")
    }
}

fn string_or_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(DoneVisitor)
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serialize_with signature
fn bool_as_string<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

//! The six translation phases
//!
//! One tagged enumeration with a total mapping to the tracking document's
//! stage index. Collapsing the phase vocabulary into a single enum removes
//! the class of bugs where a phase exists in one parallel mapping but not
//! another.

use serde::{Deserialize, Serialize};

/// A translation phase, in the tracking document's fixed stage order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Exegesis and first draft
    Exegesis,
    /// Team checking
    Team,
    /// Advisor check and back translation
    Advisor,
    /// Community testing
    Community,
    /// Consultant check
    Consultant,
    /// Published (whole-book)
    Publish,
}

impl Phase {
    /// All phases in stage order
    pub const ALL: [Phase; 6] = [
        Phase::Exegesis,
        Phase::Team,
        Phase::Advisor,
        Phase::Community,
        Phase::Consultant,
        Phase::Publish,
    ];

    /// Position of this phase in the tracking document's stage list
    #[inline]
    #[must_use]
    pub fn stage_index(self) -> usize {
        match self {
            Phase::Exegesis => 0,
            Phase::Team => 1,
            Phase::Advisor => 2,
            Phase::Community => 3,
            Phase::Consultant => 4,
            Phase::Publish => 5,
        }
    }

    /// Parse a report key into a phase
    ///
    /// Unknown keys return `None`; callers log and skip the entry.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "exegesis" => Some(Phase::Exegesis),
            "team" => Some(Phase::Team),
            "advisor" => Some(Phase::Advisor),
            "community" => Some(Phase::Community),
            "consultant" => Some(Phase::Consultant),
            "publish" => Some(Phase::Publish),
            _ => None,
        }
    }

    /// The report key for this phase
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Phase::Exegesis => "exegesis",
            Phase::Team => "team",
            Phase::Advisor => "advisor",
            Phase::Community => "community",
            Phase::Consultant => "consultant",
            Phase::Publish => "publish",
        }
    }

    /// Human label for log lines
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Exegesis => "Exegesis & First Draft",
            Phase::Team => "Team Checking",
            Phase::Advisor => "Advisor Check & Back Translation",
            Phase::Community => "Community Testing",
            Phase::Consultant => "Consultant Check",
            Phase::Publish => "Published",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::dates;

/// Sentinel stored in categorical fields that were blank in the source sheet.
pub const NO_DATA: &str = "NO DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    WorkAtHeight,
    ConfinedSpaces,
}

impl Topic {
    pub const fn ordered() -> [Self; 2] {
        [Self::WorkAtHeight, Self::ConfinedSpaces]
    }

    /// Short code used in the source sheet headers.
    pub const fn code(self) -> &'static str {
        match self {
            Self::WorkAtHeight => "TA",
            Self::ConfinedSpaces => "EC",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::WorkAtHeight => "Work at Height",
            Self::ConfinedSpaces => "Confined Spaces",
        }
    }
}

/// Which topics a view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicSelection {
    #[default]
    Both,
    WorkAtHeight,
    ConfinedSpaces,
}

impl TopicSelection {
    pub fn topics(self) -> Vec<Topic> {
        match self {
            Self::Both => Topic::ordered().to_vec(),
            Self::WorkAtHeight => vec![Topic::WorkAtHeight],
            Self::ConfinedSpaces => vec![Topic::ConfinedSpaces],
        }
    }

    pub fn includes(self, topic: Topic) -> bool {
        self.topics().contains(&topic)
    }
}

impl FromStr for TopicSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "both" | "all" | "ambos" => Ok(Self::Both),
            "ta" | "work_at_height" | "height" => Ok(Self::WorkAtHeight),
            "ec" | "confined_spaces" | "confined" => Ok(Self::ConfinedSpaces),
            other => Err(format!("unknown topic '{other}' (expected both, ta or ec)")),
        }
    }
}

/// One cell of a date-like column, typed as it was read from the roster.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawCell {
    #[default]
    Empty,
    Date(NaiveDate),
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Trimmed text cell; blanks become `Empty`.
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Reads a numeral held as text as a number. CSV carries no cell types, so
    /// date columns of a CSV roster go through this.
    pub fn with_numerals(self) -> Self {
        match self {
            Self::Text(value) => match value.parse::<f64>() {
                Ok(number) => Self::Number(number),
                Err(_) => Self::Text(value),
            },
            other => other,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Date(_) | Self::Number(_) => false,
        }
    }

    /// Trimmed, upper-cased text form used for marker comparisons.
    pub fn marker_text(&self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value.trim().to_uppercase()),
            Self::Empty => Some(String::new()),
            Self::Date(_) | Self::Number(_) => None,
        }
    }

    /// Plain string form; dates are ISO formatted so they re-import as dates.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::Number(value) => dates::format_number(*value),
            Self::Text(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicCells {
    pub theory: RawCell,
    pub practice: RawCell,
}

/// One employee or contractor row from the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    pub person_id: String,
    pub full_name: String,
    pub role: String,
    pub specialty: String,
    pub staff_type: String,
    pub company: String,
    pub work_at_height: TopicCells,
    pub confined_spaces: TopicCells,
}

impl PersonRecord {
    pub fn cells(&self, topic: Topic) -> &TopicCells {
        match topic {
            Topic::WorkAtHeight => &self.work_at_height,
            Topic::ConfinedSpaces => &self.confined_spaces,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    NoTheory,
    TheoryOnlyPendingMarker,
    TheoryOnlyNoPractice,
    Certifiable,
    InconsistentPracticeWithoutTheory,
}

impl TrainingStatus {
    /// First matching rule wins; the pending marker only matters once theory is done.
    pub const fn derive(theory_done: bool, practice_done: bool, pending_marker: bool) -> Self {
        match (theory_done, practice_done, pending_marker) {
            (true, true, _) => Self::Certifiable,
            (true, false, true) => Self::TheoryOnlyPendingMarker,
            (true, false, false) => Self::TheoryOnlyNoPractice,
            (false, true, _) => Self::InconsistentPracticeWithoutTheory,
            (false, false, _) => Self::NoTheory,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoTheory => "NO THEORY",
            Self::TheoryOnlyPendingMarker => "THEORY ONLY (practice pending - S/N)",
            Self::TheoryOnlyNoPractice => "THEORY ONLY (no practice recorded)",
            Self::Certifiable => "CERTIFIABLE",
            Self::InconsistentPracticeWithoutTheory => "INCONSISTENT (practice without theory)",
        }
    }

    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Certifiable => StatusBadge::Done,
            Self::TheoryOnlyPendingMarker | Self::TheoryOnlyNoPractice => StatusBadge::Partial,
            Self::InconsistentPracticeWithoutTheory => StatusBadge::Inconsistent,
            Self::NoTheory => StatusBadge::None,
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse per-topic progress level used to combine both topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Done,
    Partial,
    Inconsistent,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Certifiable,
    Partial,
    NoTraining,
}

impl OverallStatus {
    pub fn combine(first: StatusBadge, second: StatusBadge) -> Self {
        let started = |badge: StatusBadge| matches!(badge, StatusBadge::Done | StatusBadge::Partial);

        if first == StatusBadge::Done && second == StatusBadge::Done {
            Self::Certifiable
        } else if started(first) || started(second) {
            Self::Partial
        } else {
            Self::NoTraining
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Certifiable => "CERTIFIABLE",
            Self::Partial => "PARTIAL",
            Self::NoTraining => "NO TRAINING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    IssueCertificate,
    SchedulePractice,
    ReviewRecords,
    ScheduleTheory,
}

impl NextAction {
    pub fn recommend(overall: OverallStatus, first: StatusBadge, second: StatusBadge) -> Self {
        let either = |wanted: StatusBadge| first == wanted || second == wanted;

        if overall == OverallStatus::Certifiable {
            Self::IssueCertificate
        } else if either(StatusBadge::Partial) {
            Self::SchedulePractice
        } else if either(StatusBadge::Inconsistent) {
            Self::ReviewRecords
        } else {
            Self::ScheduleTheory
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IssueCertificate => "Issue certificate",
            Self::SchedulePractice => "Schedule practice",
            Self::ReviewRecords => "Review records",
            Self::ScheduleTheory => "Schedule theory",
        }
    }
}

/// Immutable set of records parsed from one roster source.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<PersonRecord>,
}

impl Roster {
    pub fn new(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

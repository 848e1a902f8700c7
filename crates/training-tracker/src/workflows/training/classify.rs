use serde::Serialize;

use super::dates::{format_date, format_number, parse_date_text, PLACEHOLDER};
use super::domain::{
    NextAction, OverallStatus, PersonRecord, RawCell, Topic, TopicCells, TrainingStatus,
};
use super::policy::ClassificationPolicy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicClassification {
    pub topic: Topic,
    pub theory_done: bool,
    pub practice_done: bool,
    pub practice_pending_marker: bool,
    pub status: TrainingStatus,
    pub display_date: String,
}

impl TopicClassification {
    pub fn is_certifiable(&self) -> bool {
        self.theory_done && self.practice_done
    }
}

/// A record paired with everything derived from it; never stored.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a PersonRecord,
    pub work_at_height: TopicClassification,
    pub confined_spaces: TopicClassification,
    pub overall: OverallStatus,
    pub next_action: NextAction,
}

impl ClassifiedRecord<'_> {
    pub fn topic(&self, topic: Topic) -> &TopicClassification {
        match topic {
            Topic::WorkAtHeight => &self.work_at_height,
            Topic::ConfinedSpaces => &self.confined_spaces,
        }
    }
}

pub fn classify<'a>(record: &'a PersonRecord, policy: &ClassificationPolicy) -> ClassifiedRecord<'a> {
    let work_at_height = classify_topic(Topic::WorkAtHeight, &record.work_at_height, policy);
    let confined_spaces = classify_topic(Topic::ConfinedSpaces, &record.confined_spaces, policy);

    let first = work_at_height.status.badge();
    let second = confined_spaces.status.badge();
    let overall = OverallStatus::combine(first, second);
    let next_action = NextAction::recommend(overall, first, second);

    ClassifiedRecord {
        record,
        work_at_height,
        confined_spaces,
        overall,
        next_action,
    }
}

pub fn classify_all<'a, I>(records: I, policy: &ClassificationPolicy) -> Vec<ClassifiedRecord<'a>>
where
    I: IntoIterator<Item = &'a PersonRecord>,
{
    records
        .into_iter()
        .map(|record| classify(record, policy))
        .collect()
}

pub fn classify_topic(
    topic: Topic,
    cells: &TopicCells,
    policy: &ClassificationPolicy,
) -> TopicClassification {
    let theory_done = policy.is_done(&cells.theory);
    let practice_done = policy.is_done(&cells.practice);
    let practice_pending_marker = policy.is_pending_marker(&cells.practice);
    let status = TrainingStatus::derive(theory_done, practice_done, practice_pending_marker);

    TopicClassification {
        topic,
        theory_done,
        practice_done,
        practice_pending_marker,
        status,
        display_date: display_date(status, cells, policy),
    }
}

/// Picks the one date worth showing for a topic given its status.
pub fn display_date(
    status: TrainingStatus,
    cells: &TopicCells,
    policy: &ClassificationPolicy,
) -> String {
    match status {
        TrainingStatus::Certifiable => format_cell(&cells.practice, policy),
        TrainingStatus::TheoryOnlyPendingMarker | TrainingStatus::TheoryOnlyNoPractice => {
            format_cell(&cells.theory, policy)
        }
        TrainingStatus::InconsistentPracticeWithoutTheory => {
            let practice = format_cell(&cells.practice, policy);
            if practice != PLACEHOLDER {
                practice
            } else {
                format_cell(&cells.theory, policy)
            }
        }
        TrainingStatus::NoTheory => PLACEHOLDER.to_string(),
    }
}

/// Human-readable cell: dates as DD/MM/YYYY, sentinel text verbatim.
pub fn format_cell(cell: &RawCell, policy: &ClassificationPolicy) -> String {
    match cell {
        RawCell::Empty => PLACEHOLDER.to_string(),
        RawCell::Date(date) => format_date(*date),
        RawCell::Number(value) if value.is_nan() => PLACEHOLDER.to_string(),
        RawCell::Number(value) => policy
            .display_serial(*value)
            .map(format_date)
            .unwrap_or_else(|| format_number(*value)),
        RawCell::Text(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                parse_date_text(trimmed)
                    .map(format_date)
                    .unwrap_or_else(|| trimmed.to_string())
            }
        }
    }
}

use super::super::domain::{
    NextAction, OverallStatus, StatusBadge, Topic, TrainingStatus,
};
use super::summary::{GroupAggregate, GroupKey};
use serde::{Deserialize, Serialize};

/// Visual weight a status is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Warning,
    Error,
    Info,
}

impl StatusTone {
    pub const fn for_status(status: TrainingStatus) -> Self {
        match status.badge() {
            StatusBadge::Done => Self::Success,
            StatusBadge::Partial => Self::Warning,
            StatusBadge::Inconsistent => Self::Error,
            StatusBadge::None => Self::Info,
        }
    }
}

pub const fn badge_symbol(badge: StatusBadge) -> &'static str {
    match badge {
        StatusBadge::Done => "✅",
        StatusBadge::Partial => "🟡",
        StatusBadge::Inconsistent => "⚠️",
        StatusBadge::None => "❌",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub people: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSummaryView {
    pub topic: Topic,
    pub topic_code: &'static str,
    pub topic_label: &'static str,
    pub totals: GroupAggregate,
    pub progress_bar: u8,
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupTableView {
    pub topic: Topic,
    pub topic_code: &'static str,
    pub grouping: GroupKey,
    pub grouping_label: &'static str,
    pub rows: Vec<GroupAggregate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total_records: usize,
    pub topics: Vec<TopicSummaryView>,
    pub by_company: Vec<GroupTableView>,
    pub by_staff_type: Vec<GroupTableView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingTopicEntry {
    pub topic_code: &'static str,
    pub badge: StatusBadge,
    pub badge_symbol: &'static str,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingRow {
    pub full_name: String,
    pub person_id: String,
    pub company: String,
    pub topics: Vec<ListingTopicEntry>,
    pub overall_status: OverallStatus,
    pub overall_label: &'static str,
    pub next_action: NextAction,
    pub next_action_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicDetailView {
    pub topic: Topic,
    pub topic_code: &'static str,
    pub topic_label: &'static str,
    pub theory: String,
    pub practice: String,
    pub status: TrainingStatus,
    pub status_label: &'static str,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonDetailView {
    pub person_id: String,
    pub full_name: String,
    pub role: String,
    pub specialty: String,
    pub staff_type: String,
    pub company: String,
    pub topics: Vec<TopicDetailView>,
    pub overall_status: OverallStatus,
    pub overall_label: &'static str,
    pub next_action: NextAction,
    pub next_action_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub company: String,
    pub people: usize,
    pub topics: Vec<TopicSummaryView>,
    pub listing: Vec<ListingRow>,
}

/// Distinct values feeding the selector controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterOptions {
    pub staff_types: Vec<String>,
    pub companies: Vec<String>,
    pub person_ids: Vec<String>,
    pub full_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupField {
    Id,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonLookup {
    pub by: LookupField,
    pub value: String,
}

impl PersonLookup {
    pub fn by_id(value: impl Into<String>) -> Self {
        Self {
            by: LookupField::Id,
            value: value.into(),
        }
    }

    pub fn by_name(value: impl Into<String>) -> Self {
        Self {
            by: LookupField::Name,
            value: value.into(),
        }
    }
}

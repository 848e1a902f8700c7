use super::super::classify::{classify_all, format_cell, ClassifiedRecord};
use super::super::domain::{PersonRecord, Roster, Topic, TopicSelection};
use super::super::filter::RosterFilter;
use super::super::policy::ClassificationPolicy;
use super::views::{
    badge_symbol, ChartBar, CompanyView, DashboardView, GroupTableView, ListingRow,
    ListingTopicEntry, LookupField, PersonDetailView, PersonLookup, RosterOptions,
    StatusTone, TopicDetailView, TopicSummaryView,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const NO_MATCH_NOTICE: &str =
    "No records match the current filters. Select more companies or staff types.";

const TOTAL_KEY: &str = "TOTAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Company,
    StaffType,
}

impl GroupKey {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::StaffType => "Staff type",
        }
    }

    pub fn key_of(self, record: &PersonRecord) -> &str {
        match self {
            Self::Company => &record.company,
            Self::StaffType => &record.staff_type,
        }
    }
}

/// Progress of one group, measured against people who finished theory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    pub key: String,
    pub people: usize,
    pub theory_base: usize,
    pub certifiable: usize,
    pub pending: usize,
    pub progress_pct: f64,
}

impl GroupAggregate {
    pub fn from_counts(
        key: impl Into<String>,
        people: usize,
        theory_base: usize,
        certifiable: usize,
    ) -> Self {
        let certifiable = certifiable.min(theory_base);
        let progress_pct = if theory_base == 0 {
            0.0
        } else {
            certifiable as f64 / theory_base as f64 * 100.0
        };

        Self {
            key: key.into(),
            people,
            theory_base,
            certifiable,
            pending: theory_base - certifiable,
            progress_pct,
        }
    }

    /// Whole-percent value for a 0-100 progress bar.
    pub fn progress_bar(&self) -> u8 {
        self.progress_pct.round().clamp(0.0, 100.0) as u8
    }
}

pub fn aggregate(key: &str, records: &[&ClassifiedRecord<'_>], topic: Topic) -> GroupAggregate {
    let mut theory_base = 0;
    let mut certifiable = 0;

    for record in records {
        let classification = record.topic(topic);
        if classification.theory_done {
            theory_base += 1;
            if classification.practice_done {
                certifiable += 1;
            }
        }
    }

    GroupAggregate::from_counts(key, records.len(), theory_base, certifiable)
}

pub fn aggregate_total(records: &[ClassifiedRecord<'_>], topic: Topic) -> GroupAggregate {
    let refs: Vec<&ClassifiedRecord<'_>> = records.iter().collect();
    aggregate(TOTAL_KEY, &refs, topic)
}

/// Per-group aggregates, best progress first; ties fall back to base size then key.
pub fn aggregate_by(
    records: &[ClassifiedRecord<'_>],
    topic: Topic,
    group: GroupKey,
) -> Vec<GroupAggregate> {
    let mut groups: BTreeMap<&str, Vec<&ClassifiedRecord<'_>>> = BTreeMap::new();
    for record in records {
        groups
            .entry(group.key_of(record.record))
            .or_default()
            .push(record);
    }

    let mut aggregates: Vec<GroupAggregate> = groups
        .into_iter()
        .map(|(key, members)| aggregate(key, &members, topic))
        .collect();

    aggregates.sort_by(|a, b| {
        b.progress_pct
            .total_cmp(&a.progress_pct)
            .then_with(|| b.theory_base.cmp(&a.theory_base))
            .then_with(|| a.key.cmp(&b.key))
    });
    aggregates
}

pub fn roster_options(roster: &Roster) -> RosterOptions {
    RosterOptions {
        staff_types: distinct(roster, |record| &record.staff_type),
        companies: distinct(roster, |record| &record.company),
        person_ids: distinct(roster, |record| &record.person_id),
        full_names: distinct(roster, |record| &record.full_name),
    }
}

fn distinct<F>(roster: &Roster, pick: F) -> Vec<String>
where
    F: Fn(&PersonRecord) -> &String,
{
    roster
        .records()
        .iter()
        .map(|record| pick(record).clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filtered, classified view of a roster for one request.
#[derive(Debug)]
pub struct TrainingReport<'a> {
    selection: TopicSelection,
    policy: ClassificationPolicy,
    records: Vec<ClassifiedRecord<'a>>,
}

impl<'a> TrainingReport<'a> {
    pub fn build(roster: &'a Roster, filter: &RosterFilter, policy: &ClassificationPolicy) -> Self {
        let records = classify_all(filter.apply(roster.records()), policy);
        Self {
            selection: filter.topic,
            policy: policy.clone(),
            records,
        }
    }

    pub fn records(&self) -> &[ClassifiedRecord<'a>] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dashboard(&self) -> DashboardView {
        let topics = self.selection.topics();
        let tables = |group: GroupKey| -> Vec<GroupTableView> {
            topics
                .iter()
                .map(|&topic| GroupTableView {
                    topic,
                    topic_code: topic.code(),
                    grouping: group,
                    grouping_label: group.label(),
                    rows: aggregate_by(&self.records, topic, group),
                })
                .collect()
        };

        DashboardView {
            total_records: self.records.len(),
            topics: topic_summaries(&self.records, &topics),
            by_company: tables(GroupKey::Company),
            by_staff_type: tables(GroupKey::StaffType),
            notice: self.is_empty().then(|| NO_MATCH_NOTICE.to_string()),
        }
    }

    pub fn listing(&self) -> Vec<ListingRow> {
        let refs: Vec<&ClassifiedRecord<'a>> = self.records.iter().collect();
        listing_rows(&refs, &self.selection.topics())
    }

    /// First match within the filtered set, like picking from a selector.
    pub fn person(&self, lookup: &PersonLookup) -> Option<PersonDetailView> {
        let wanted = lookup.value.trim();
        let wanted_name = wanted.to_lowercase();
        let found = self.records.iter().find(|classified| match lookup.by {
            LookupField::Id => classified.record.person_id == wanted,
            LookupField::Name => classified.record.full_name.to_lowercase() == wanted_name,
        })?;

        let record = found.record;
        let topics = self
            .selection
            .topics()
            .into_iter()
            .map(|topic| {
                let classification = found.topic(topic);
                let cells = record.cells(topic);
                TopicDetailView {
                    topic,
                    topic_code: topic.code(),
                    topic_label: topic.label(),
                    theory: format_cell(&cells.theory, &self.policy),
                    practice: format_cell(&cells.practice, &self.policy),
                    status: classification.status,
                    status_label: classification.status.label(),
                    tone: StatusTone::for_status(classification.status),
                }
            })
            .collect();

        Some(PersonDetailView {
            person_id: record.person_id.clone(),
            full_name: record.full_name.clone(),
            role: record.role.clone(),
            specialty: record.specialty.clone(),
            staff_type: record.staff_type.clone(),
            company: record.company.clone(),
            topics,
            overall_status: found.overall,
            overall_label: found.overall.label(),
            next_action: found.next_action,
            next_action_label: found.next_action.label(),
        })
    }

    pub fn company(&self, company: &str) -> Option<CompanyView> {
        let members: Vec<ClassifiedRecord<'a>> = self
            .records
            .iter()
            .filter(|classified| classified.record.company == company)
            .cloned()
            .collect();
        if members.is_empty() {
            return None;
        }

        let refs: Vec<&ClassifiedRecord<'a>> = members.iter().collect();
        Some(CompanyView {
            company: company.to_string(),
            people: members.len(),
            topics: topic_summaries(&members, &self.selection.topics()),
            listing: listing_rows(&refs, &self.selection.topics()),
        })
    }
}

fn topic_summaries(records: &[ClassifiedRecord<'_>], topics: &[Topic]) -> Vec<TopicSummaryView> {
    topics
        .iter()
        .map(|&topic| {
            let totals = aggregate_total(records, topic);
            TopicSummaryView {
                topic,
                topic_code: topic.code(),
                topic_label: topic.label(),
                progress_bar: totals.progress_bar(),
                chart: vec![
                    ChartBar {
                        label: "Certifiable",
                        people: totals.certifiable,
                    },
                    ChartBar {
                        label: "Pending",
                        people: totals.pending,
                    },
                ],
                totals,
            }
        })
        .collect()
}

fn listing_rows(records: &[&ClassifiedRecord<'_>], topics: &[Topic]) -> Vec<ListingRow> {
    let mut rows: Vec<ListingRow> = records
        .iter()
        .map(|classified| {
            let topics = topics
                .iter()
                .map(|&topic| {
                    let classification = classified.topic(topic);
                    let badge = classification.status.badge();
                    ListingTopicEntry {
                        topic_code: topic.code(),
                        badge,
                        badge_symbol: badge_symbol(badge),
                        date: classification.display_date.clone(),
                    }
                })
                .collect();

            ListingRow {
                full_name: classified.record.full_name.clone(),
                person_id: classified.record.person_id.clone(),
                company: classified.record.company.clone(),
                topics,
                overall_status: classified.overall,
                overall_label: classified.overall.label(),
                next_action: classified.next_action,
                next_action_label: classified.next_action.label(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.full_name
            .cmp(&b.full_name)
            .then_with(|| a.person_id.cmp(&b.person_id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::training::domain::{RawCell, TopicCells};
    use chrono::NaiveDate;

    fn done() -> RawCell {
        RawCell::Date(NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date"))
    }

    fn person(id: usize, company: &str, theory: RawCell, practice: RawCell) -> PersonRecord {
        PersonRecord {
            person_id: id.to_string(),
            full_name: format!("Person {id:02}"),
            role: "Operator".to_string(),
            specialty: "General".to_string(),
            staff_type: "Own".to_string(),
            company: company.to_string(),
            work_at_height: TopicCells { theory, practice },
            confined_spaces: TopicCells::default(),
        }
    }

    fn roster(records: Vec<PersonRecord>) -> Roster {
        Roster::new(records)
    }

    #[test]
    fn ten_with_theory_and_four_certified_is_forty_percent() {
        let records = (0..12)
            .map(|id| {
                let theory = if id < 10 { done() } else { RawCell::Empty };
                let practice = if id < 4 { done() } else { RawCell::Empty };
                person(id, "Acme", theory, practice)
            })
            .collect();
        let roster = roster(records);
        let report = TrainingReport::build(
            &roster,
            &RosterFilter::default(),
            &ClassificationPolicy::strict(),
        );

        let total = aggregate_total(report.records(), Topic::WorkAtHeight);
        assert_eq!(total.people, 12);
        assert_eq!(total.theory_base, 10);
        assert_eq!(total.certifiable, 4);
        assert_eq!(total.pending, 6);
        assert!((total.progress_pct - 40.0).abs() < f64::EPSILON);
        assert_eq!(total.progress_bar(), 40);
    }

    #[test]
    fn groups_sort_by_progress_then_base_then_key() {
        let records = vec![
            person(1, "Gamma", done(), RawCell::Empty),
            person(2, "Beta", done(), done()),
            person(3, "Alpha", done(), done()),
            person(4, "Alpha", done(), done()),
            person(5, "Delta", RawCell::Empty, RawCell::Empty),
            person(6, "Beta2", done(), done()),
        ];
        let roster = roster(records);
        let report = TrainingReport::build(
            &roster,
            &RosterFilter::default(),
            &ClassificationPolicy::strict(),
        );

        let groups = aggregate_by(report.records(), Topic::WorkAtHeight, GroupKey::Company);
        let keys: Vec<&str> = groups.iter().map(|group| group.key.as_str()).collect();
        assert_eq!(keys, vec!["Alpha", "Beta", "Beta2", "Gamma", "Delta"]);

        let delta = groups.last().expect("delta group");
        assert_eq!(delta.theory_base, 0);
        assert_eq!(delta.progress_pct, 0.0);
    }

    #[test]
    fn empty_filter_result_degrades_to_zero() {
        let roster = roster(vec![person(1, "Acme", done(), done())]);
        let filter = RosterFilter {
            companies: Some(BTreeSet::new()),
            ..RosterFilter::default()
        };
        let report = TrainingReport::build(&roster, &filter, &ClassificationPolicy::strict());
        let dashboard = report.dashboard();

        assert_eq!(dashboard.total_records, 0);
        assert_eq!(dashboard.notice.as_deref(), Some(NO_MATCH_NOTICE));
        assert!(dashboard
            .topics
            .iter()
            .all(|summary| summary.totals.progress_pct == 0.0 && summary.progress_bar == 0));
    }

    #[test]
    fn name_lookup_folds_accented_case() {
        let mut record = person(7, "Acme", done(), done());
        record.full_name = "Pérez, Juan".to_string();
        let roster = roster(vec![record]);
        let report = TrainingReport::build(
            &roster,
            &RosterFilter::default(),
            &ClassificationPolicy::strict(),
        );

        let found = report
            .person(&PersonLookup::by_name(" PÉREZ, JUAN "))
            .expect("accented name matches");
        assert_eq!(found.person_id, "7");
        assert!(report.person(&PersonLookup::by_name("Perez, Juan")).is_none());
    }

    #[test]
    fn certifiable_never_exceeds_base() {
        let aggregate = GroupAggregate::from_counts("x", 3, 2, 5);
        assert_eq!(aggregate.certifiable, 2);
        assert_eq!(aggregate.pending, 0);
        assert!(aggregate.progress_pct <= 100.0);
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let roster = roster(vec![
            person(2, "Beta", done(), done()),
            person(1, "Acme", done(), done()),
            person(3, "Beta", done(), done()),
        ]);
        let options = roster_options(&roster);
        assert_eq!(options.companies, vec!["Acme", "Beta"]);
        assert_eq!(options.staff_types, vec!["Own"]);
        assert_eq!(options.person_ids, vec!["1", "2", "3"]);
    }
}

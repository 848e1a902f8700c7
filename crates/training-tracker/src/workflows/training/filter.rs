use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::{PersonRecord, TopicSelection};

/// User-selected predicates applied before any view is built.
///
/// `None` on a set means "no restriction"; an explicit empty set matches nothing,
/// the same as clearing every option of a multi-select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterFilter {
    #[serde(default)]
    pub topic: TopicSelection,
    #[serde(default)]
    pub staff_types: Option<BTreeSet<String>>,
    #[serde(default)]
    pub companies: Option<BTreeSet<String>>,
    #[serde(default)]
    pub search: Option<String>,
}

impl RosterFilter {
    pub fn matches(&self, record: &PersonRecord) -> bool {
        let allowed = |selection: &Option<BTreeSet<String>>, value: &str| {
            selection
                .as_ref()
                .map_or(true, |options| options.contains(value))
        };

        allowed(&self.staff_types, &record.staff_type)
            && allowed(&self.companies, &record.company)
            && self.matches_search(record)
    }

    pub fn apply<'a>(&self, records: &'a [PersonRecord]) -> Vec<&'a PersonRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    fn matches_search(&self, record: &PersonRecord) -> bool {
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        else {
            return true;
        };

        let needle = needle.to_lowercase();
        record.person_id.to_lowercase().contains(&needle)
            || record.full_name.to_lowercase().contains(&needle)
    }
}

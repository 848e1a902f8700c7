use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::dates::{parse_date_text, serial_to_date};
use super::domain::RawCell;

/// Spreadsheet serials at or below this value are not treated as dates (≈ 1982-02-18).
pub const DEFAULT_NUMERIC_DATE_THRESHOLD: f64 = 30_000.0;

pub const DEFAULT_NOT_DONE_MARKERS: &[&str] = &["", "PENDING", "S/N", "SN", "NO", "N/A", "NA"];

pub const DEFAULT_PENDING_MARKERS: &[&str] = &["S/N", "SN"];

/// Rules deciding whether a roster cell counts as a completed training date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPolicy {
    /// `None` accepts any finite number as a date serial.
    pub numeric_date_threshold: Option<f64>,
    pub not_done_markers: BTreeSet<String>,
    pub pending_markers: BTreeSet<String>,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

impl ClassificationPolicy {
    pub fn strict() -> Self {
        Self {
            numeric_date_threshold: Some(DEFAULT_NUMERIC_DATE_THRESHOLD),
            not_done_markers: normalize_markers(DEFAULT_NOT_DONE_MARKERS.iter().copied()),
            pending_markers: normalize_markers(DEFAULT_PENDING_MARKERS.iter().copied()),
        }
    }

    pub fn lenient() -> Self {
        Self {
            numeric_date_threshold: None,
            ..Self::strict()
        }
    }

    pub fn with_numeric_date_threshold(mut self, threshold: Option<f64>) -> Self {
        self.numeric_date_threshold = threshold;
        self
    }

    pub fn with_pending_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pending_markers = normalize_markers(markers);
        self
    }

    /// True only when the cell holds a genuine calendar date.
    pub fn is_done(&self, cell: &RawCell) -> bool {
        match cell {
            RawCell::Empty => false,
            RawCell::Date(_) => true,
            RawCell::Number(value) => self.numeric_is_date(*value),
            RawCell::Text(value) => {
                let marker = value.trim().to_uppercase();
                if self.not_done_markers.contains(&marker) {
                    return false;
                }
                parse_date_text(value).is_some()
            }
        }
    }

    /// True when a practice cell is explicitly annotated as outstanding.
    pub fn is_pending_marker(&self, cell: &RawCell) -> bool {
        cell.marker_text()
            .is_some_and(|text| self.pending_markers.contains(&text))
    }

    pub fn numeric_is_date(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }

        match self.numeric_date_threshold {
            Some(threshold) => value > threshold,
            None => true,
        }
    }

    /// Serial conversion for display; small numbers are never rendered as 1900-era dates.
    pub(crate) fn display_serial(&self, value: f64) -> Option<chrono::NaiveDate> {
        let threshold = self
            .numeric_date_threshold
            .unwrap_or(DEFAULT_NUMERIC_DATE_THRESHOLD);
        if value.is_finite() && value > threshold {
            serial_to_date(value)
        } else {
            None
        }
    }
}

fn normalize_markers<I, S>(markers: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    markers
        .into_iter()
        .map(|marker| marker.as_ref().trim().to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(value: &str) -> RawCell {
        RawCell::Text(value.to_string())
    }

    #[test]
    fn blanks_and_markers_are_not_done() {
        let policy = ClassificationPolicy::strict();
        assert!(!policy.is_done(&RawCell::Empty));
        assert!(!policy.is_done(&text("")));
        assert!(!policy.is_done(&text("S/N")));
        assert!(!policy.is_done(&text(" pending ")));
        assert!(!policy.is_done(&text("n/a")));
        assert!(!policy.is_done(&text("see notes")));
    }

    #[test]
    fn dates_and_date_text_are_done() {
        let policy = ClassificationPolicy::strict();
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).expect("valid date");
        assert!(policy.is_done(&RawCell::Date(date)));
        assert!(policy.is_done(&text("01/05/2023")));
        assert!(policy.is_done(&text("2023-05-01")));
    }

    #[test]
    fn strict_threshold_excludes_small_numbers() {
        let policy = ClassificationPolicy::strict();
        assert!(!policy.is_done(&RawCell::Number(29999.0)));
        assert!(!policy.is_done(&RawCell::Number(30000.0)));
        assert!(policy.is_done(&RawCell::Number(30001.0)));
        assert!(!policy.is_done(&RawCell::Number(f64::NAN)));
        assert!(!policy.is_done(&RawCell::Number(f64::INFINITY)));
    }

    #[test]
    fn lenient_policy_accepts_any_finite_number() {
        let policy = ClassificationPolicy::lenient();
        assert!(policy.is_done(&RawCell::Number(3.0)));
        assert!(!policy.is_done(&RawCell::Number(f64::NAN)));
    }

    #[test]
    fn pending_markers_are_narrower_than_not_done() {
        let policy = ClassificationPolicy::strict();
        assert!(policy.is_pending_marker(&text(" s/n ")));
        assert!(policy.is_pending_marker(&text("SN")));
        assert!(!policy.is_pending_marker(&text("PENDING")));
        assert!(!policy.is_pending_marker(&RawCell::Empty));
        assert!(!policy.is_pending_marker(&RawCell::Number(45000.0)));

        let slash_only = ClassificationPolicy::strict().with_pending_markers(["s/n"]);
        assert!(!slash_only.is_pending_marker(&text("SN")));
    }
}

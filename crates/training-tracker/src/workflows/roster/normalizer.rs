use crate::workflows::training::dates::format_number;
use crate::workflows::training::domain::{RawCell, NO_DATA};

// Spellings a spreadsheet tool leaves behind for missing values.
const MISSING_SPELLINGS: &[&str] = &["nan", "NaN", "None"];

pub(crate) fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

pub(crate) fn is_ignored_header(value: &str) -> bool {
    let header = normalize_header(value);
    header.is_empty() || header.starts_with("Unnamed")
}

pub(crate) fn cell_text(cell: &RawCell) -> String {
    match cell {
        RawCell::Number(value) => format_number(*value),
        RawCell::Text(value) => value.trim().to_string(),
        other => other.to_plain_string(),
    }
}

/// Categorical field: trimmed, blank or missing spellings become [`NO_DATA`].
pub(crate) fn category(cell: &RawCell) -> String {
    let text = cell_text(cell);
    if text.is_empty() || MISSING_SPELLINGS.contains(&text.as_str()) {
        NO_DATA.to_string()
    } else {
        text
    }
}

/// Identity numbers stored as floats gain a spurious `.0`; that suffix is the only change.
pub(crate) fn person_id(cell: &RawCell) -> String {
    let text = cell_text(cell);
    let text = text.strip_suffix(".0").unwrap_or(&text).trim();
    category(&RawCell::Text(text.to_string()))
}

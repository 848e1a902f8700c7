use super::RosterImportError;
use crate::workflows::training::dates::{parse_date_text, serial_to_date};
use crate::workflows::training::domain::RawCell;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Reads the first worksheet, padded so row/column offsets match the sheet grid.
pub(crate) fn read_first_sheet(path: &Path) -> Result<Vec<Vec<RawCell>>, RosterImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RosterImportError::EmptyWorkbook)??;

    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<RawCell>> {
    // Ranges start at the first used cell, not at A1.
    let (row_offset, column_offset) = range
        .start()
        .map(|(row, column)| (row as usize, column as usize))
        .unwrap_or((0, 0));

    let mut rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![RawCell::Empty; column_offset];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    rows
}

fn cell_from_data(data: &Data) -> RawCell {
    match data {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        // Text stays text even when it looks like a number.
        Data::String(value) => RawCell::from_text(value),
        Data::Float(value) => RawCell::Number(*value),
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Bool(value) => RawCell::Text(value.to_string().to_uppercase()),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            serial_to_date(serial)
                .map(RawCell::Date)
                .unwrap_or(RawCell::Number(serial))
        }
        Data::DateTimeIso(value) => parse_date_text(value)
            .map(RawCell::Date)
            .unwrap_or_else(|| RawCell::Text(value.clone())),
        Data::DurationIso(value) => RawCell::Text(value.clone()),
    }
}

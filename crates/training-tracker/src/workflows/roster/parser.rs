use crate::workflows::training::domain::RawCell;
use std::io::Read;

/// Reads every CSV line, header rows included, as trimmed text cells.
///
/// Header detection happens later so title rows above the header survive.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<Vec<RawCell>>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(RawCell::from_text).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn keeps_ragged_title_rows() {
        let rows = parse_rows(Cursor::new(
            "Training roster\n\nName,Theory\n\"Perez, Juan\",45047\n",
        ))
        .expect("parse");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![RawCell::Text("Training roster".to_string())]);
        assert_eq!(rows[2][0], RawCell::Text("Perez, Juan".to_string()));
        assert_eq!(rows[2][1], RawCell::Text("45047".to_string()));
    }
}

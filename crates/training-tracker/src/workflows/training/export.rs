use std::io::Write;

use super::classify::ClassifiedRecord;
use super::domain::Topic;
use crate::workflows::roster::Column;

const DERIVED_HEADERS: &[&str] = &[
    "TA - ESTADO",
    "TA - FECHA",
    "EC - ESTADO",
    "EC - FECHA",
    "ESTADO GENERAL",
    "ACCIÓN",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Writes the roster columns, as read, followed by the derived status columns.
///
/// The output re-imports with a header offset of zero.
pub fn write_csv<W: Write>(writer: W, records: &[ClassifiedRecord<'_>]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let headers = Column::ordered()
        .into_iter()
        .map(|column| column.header())
        .chain(DERIVED_HEADERS.iter().copied());
    csv_writer.write_record(headers)?;

    for classified in records {
        let record = classified.record;
        let mut row: Vec<String> = Column::ordered()
            .into_iter()
            .map(|column| column.value_of(record))
            .collect();

        for topic in Topic::ordered() {
            let classification = classified.topic(topic);
            row.push(classification.status.label().to_string());
            row.push(classification.display_date.clone());
        }
        row.push(classified.overall.label().to_string());
        row.push(classified.next_action.label().to_string());

        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[ClassifiedRecord<'_>]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}

mod normalizer;
mod parser;
mod schema;
mod workbook;

use crate::workflows::training::domain::{PersonRecord, RawCell, Roster, TopicCells};
use crate::workflows::training::RosterSource;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use schema::ColumnIndex;
pub use schema::{Column, SchemaError};

/// Header offset of the stock roster workbook: two title rows sit above it.
pub const DEFAULT_HEADER_ROW: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid roster workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("roster workbook has no worksheets")]
    EmptyWorkbook,
    #[error("unsupported roster format '{0}' (expected .xlsx, .xlsm, .xls, .ods or .csv)")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// How text found in the four date columns is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateText {
    /// CSV: numerals are serial numbers.
    Numerals,
    /// Typed sources: text stays text.
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterImporter {
    header_row: usize,
}

impl Default for RosterImporter {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_ROW)
    }
}

impl RosterImporter {
    pub fn new(header_row: usize) -> Self {
        Self { header_row }
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> Result<Roster, RosterImportError> {
        let path = path.as_ref();
        std::fs::metadata(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self.import_reader(std::fs::File::open(path)?),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                let rows = workbook::read_first_sheet(path)?;
                Ok(self.build(rows, DateText::Verbatim)?)
            }
            other => Err(RosterImportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Roster, RosterImportError> {
        let rows = parser::parse_rows(reader)?;
        Ok(self.build(rows, DateText::Numerals)?)
    }

    /// Builds records from a grid of already typed cells whose header sits at `header_row`.
    pub fn import_rows(&self, rows: Vec<Vec<RawCell>>) -> Result<Roster, SchemaError> {
        self.build(rows, DateText::Verbatim)
    }

    fn build(&self, rows: Vec<Vec<RawCell>>, date_text: DateText) -> Result<Roster, SchemaError> {
        let headers: Vec<String> = rows
            .get(self.header_row)
            .map(|row| row.iter().map(normalizer::cell_text).collect())
            .unwrap_or_default();

        let index = ColumnIndex::resolve(&headers, self.header_row).inspect_err(|err| {
            warn!(missing = ?err.missing, header_row = self.header_row, "roster schema mismatch");
        })?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows.iter().skip(self.header_row + 1) {
            match person_from_row(&index, row, date_text) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped blank roster rows");
        }

        Ok(Roster::new(records))
    }
}

fn person_from_row(
    index: &ColumnIndex,
    row: &[RawCell],
    date_text: DateText,
) -> Option<PersonRecord> {
    if Column::ordered()
        .into_iter()
        .all(|column| index.cell(row, column).is_blank())
    {
        return None;
    }

    let cell = |column: Column| index.cell(row, column);
    let date = |column: Column| match date_text {
        DateText::Numerals => cell(column).clone().with_numerals(),
        DateText::Verbatim => cell(column).clone(),
    };
    Some(PersonRecord {
        person_id: normalizer::person_id(cell(Column::PersonId)),
        full_name: normalizer::category(cell(Column::FullName)),
        role: normalizer::category(cell(Column::Role)),
        specialty: normalizer::category(cell(Column::Specialty)),
        staff_type: normalizer::category(cell(Column::StaffType)),
        company: normalizer::category(cell(Column::Company)),
        work_at_height: TopicCells {
            theory: date(Column::WorkAtHeightTheory),
            practice: date(Column::WorkAtHeightPractice),
        },
        confined_spaces: TopicCells {
            theory: date(Column::ConfinedSpacesTheory),
            practice: date(Column::ConfinedSpacesPractice),
        },
    })
}

/// Roster file on disk, re-read on every cache miss.
#[derive(Debug, Clone)]
pub struct FileRosterSource {
    path: PathBuf,
    importer: RosterImporter,
}

impl FileRosterSource {
    pub fn new(path: impl Into<PathBuf>, importer: RosterImporter) -> Self {
        Self {
            path: path.into(),
            importer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterSource for FileRosterSource {
    fn load(&self) -> Result<Roster, RosterImportError> {
        self.importer.import_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

use super::normalizer::{is_ignored_header, normalize_header};
use crate::workflows::training::domain::{PersonRecord, RawCell};
use std::collections::HashMap;

/// Columns the roster sheet must carry, named exactly as in the source workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    FullName,
    PersonId,
    Role,
    Specialty,
    WorkAtHeightTheory,
    WorkAtHeightPractice,
    ConfinedSpacesTheory,
    ConfinedSpacesPractice,
    StaffType,
    Company,
}

impl Column {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::FullName,
            Self::PersonId,
            Self::Role,
            Self::Specialty,
            Self::WorkAtHeightTheory,
            Self::WorkAtHeightPractice,
            Self::ConfinedSpacesTheory,
            Self::ConfinedSpacesPractice,
            Self::StaffType,
            Self::Company,
        ]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::FullName => "Apellido y Nombre",
            Self::PersonId => "DNI",
            Self::Role => "Puesto",
            Self::Specialty => "Especialidad",
            Self::WorkAtHeightTheory => "TA - TEORÍA",
            Self::WorkAtHeightPractice => "TA - PRÁCTICA",
            Self::ConfinedSpacesTheory => "EC - TEORÍA",
            Self::ConfinedSpacesPractice => "EC - PRÁCTICA",
            Self::StaffType => "Tipo de personal",
            Self::Company => "Empresa",
        }
    }

    /// Value written back out for this column when exporting a record.
    pub fn value_of(self, record: &PersonRecord) -> String {
        match self {
            Self::FullName => record.full_name.clone(),
            Self::PersonId => record.person_id.clone(),
            Self::Role => record.role.clone(),
            Self::Specialty => record.specialty.clone(),
            Self::WorkAtHeightTheory => record.work_at_height.theory.to_plain_string(),
            Self::WorkAtHeightPractice => record.work_at_height.practice.to_plain_string(),
            Self::ConfinedSpacesTheory => record.confined_spaces.theory.to_plain_string(),
            Self::ConfinedSpacesPractice => record.confined_spaces.practice.to_plain_string(),
            Self::StaffType => record.staff_type.clone(),
            Self::Company => record.company.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "roster is missing columns: {}. If they exist but are not detected, change the header row offset (currently {header_row}; the usual values are 2, 1 or 0)",
    .missing.join(", ")
)]
pub struct SchemaError {
    pub missing: Vec<String>,
    pub header_row: usize,
}

/// Position of every required column within a data row.
#[derive(Debug, Clone)]
pub(crate) struct ColumnIndex {
    positions: HashMap<Column, usize>,
}

impl ColumnIndex {
    pub(crate) fn resolve(headers: &[String], header_row: usize) -> Result<Self, SchemaError> {
        let mut positions = HashMap::new();
        for (position, header) in headers.iter().enumerate() {
            if is_ignored_header(header) {
                continue;
            }
            let header = normalize_header(header);
            if let Some(column) = Column::ordered()
                .into_iter()
                .find(|column| column.header() == header)
            {
                positions.entry(column).or_insert(position);
            }
        }

        let missing: Vec<String> = Column::ordered()
            .into_iter()
            .filter(|column| !positions.contains_key(column))
            .map(|column| column.header().to_string())
            .collect();

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(SchemaError {
                missing,
                header_row,
            })
        }
    }

    pub(crate) fn cell<'r>(&self, row: &'r [RawCell], column: Column) -> &'r RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.positions
            .get(&column)
            .and_then(|position| row.get(*position))
            .unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn resolves_columns_in_any_order() {
        let mut names: Vec<&str> = Column::ordered().iter().map(|c| c.header()).collect();
        names.reverse();
        names.insert(3, "Unnamed: 3");
        let index = ColumnIndex::resolve(&headers(&names), 0).expect("all columns present");

        let row: Vec<RawCell> = names
            .iter()
            .map(|name| RawCell::Text(name.to_string()))
            .collect();
        assert_eq!(
            index.cell(&row, Column::PersonId),
            &RawCell::Text("DNI".to_string())
        );
    }

    #[test]
    fn reports_every_missing_column() {
        let error = ColumnIndex::resolve(&headers(&["Apellido y Nombre", " DNI "]), 2)
            .expect_err("columns missing");
        assert_eq!(error.missing.len(), 8);
        assert!(error.missing.contains(&"TA - PRÁCTICA".to_string()));
        assert!(!error.missing.contains(&"DNI".to_string()));
        let message = error.to_string();
        assert!(message.contains("Empresa"));
        assert!(message.contains("header row offset (currently 2"));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let names: Vec<&str> = Column::ordered().iter().map(|c| c.header()).collect();
        let index = ColumnIndex::resolve(&headers(&names), 0).expect("all columns present");
        assert_eq!(index.cell(&[], Column::Company), &RawCell::Empty);
    }
}

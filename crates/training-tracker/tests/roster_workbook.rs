//! The stock roster format: an xlsx workbook with title rows above the header.

use chrono::NaiveDate;
use training_tracker::workflows::roster::RosterImporter;
use training_tracker::workflows::training::report::views::PersonLookup;
use training_tracker::workflows::training::{
    classify_all, ClassificationPolicy, OverallStatus, RawCell, Roster, RosterFilter,
    TrainingReport, TrainingStatus,
};

fn fixture() -> Roster {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/roster.xlsx");
    RosterImporter::new(2)
        .import_path(path)
        .expect("workbook imports")
}

fn date(year: i32, month: u32, day: u32) -> RawCell {
    RawCell::Date(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
}

#[test]
fn date_formatted_cells_become_dates() {
    let roster = fixture();
    assert_eq!(roster.len(), 2);

    let juan = &roster.records()[0];
    assert_eq!(juan.work_at_height.theory, date(2023, 5, 1));
    assert_eq!(juan.work_at_height.practice, date(2023, 6, 23));
    assert_eq!(juan.confined_spaces.theory, RawCell::Empty);
    assert_eq!(juan.confined_spaces.practice, RawCell::Text("S/N".to_string()));

    let ana = &roster.records()[1];
    assert_eq!(ana.confined_spaces.theory, date(2024, 1, 1));
    assert_eq!(ana.confined_spaces.practice, date(2024, 1, 15));
}

#[test]
fn text_cells_keep_their_exact_spelling() {
    let roster = fixture();
    let juan = &roster.records()[0];
    assert_eq!(juan.full_name, "Pérez, Juan");
    assert_eq!(juan.person_id, "00123456");
    assert_eq!(juan.company, "007");

    let ana = &roster.records()[1];
    assert_eq!(ana.person_id, "28999000");
    assert_eq!(ana.work_at_height.theory, RawCell::Text("45047".to_string()));
}

#[test]
fn numeral_text_in_a_date_column_is_not_a_completion() {
    let roster = fixture();
    let classified = classify_all(roster.records(), &ClassificationPolicy::strict());

    assert_eq!(classified[0].work_at_height.status, TrainingStatus::Certifiable);
    assert_eq!(classified[0].confined_spaces.status, TrainingStatus::NoTheory);
    assert_eq!(classified[1].work_at_height.status, TrainingStatus::NoTheory);
    assert_eq!(classified[1].confined_spaces.status, TrainingStatus::Certifiable);
    assert_eq!(classified[1].overall, OverallStatus::Partial);
}

#[test]
fn lookups_use_the_ids_and_names_as_written() {
    let roster = fixture();
    let policy = ClassificationPolicy::strict();
    let report = TrainingReport::build(&roster, &RosterFilter::default(), &policy);

    let by_id = report
        .person(&PersonLookup::by_id("00123456"))
        .expect("id with leading zeros resolves");
    assert_eq!(by_id.company, "007");

    let by_name = report
        .person(&PersonLookup::by_name("PÉREZ, JUAN"))
        .expect("name matches regardless of case");
    assert_eq!(by_name.person_id, "00123456");
}

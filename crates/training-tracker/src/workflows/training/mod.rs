mod cache;
mod classify;
pub mod dates;
pub mod domain;
mod export;
mod filter;
mod policy;
pub mod report;
mod router;
mod service;

pub use cache::{RosterCache, RosterSource};
pub use classify::{
    classify, classify_all, classify_topic, display_date, format_cell, ClassifiedRecord,
    TopicClassification,
};
pub use domain::{
    NextAction, OverallStatus, PersonRecord, RawCell, Roster, StatusBadge, Topic, TopicCells,
    TopicSelection, TrainingStatus, NO_DATA,
};
pub use export::{to_csv_string, write_csv, ExportError};
pub use filter::RosterFilter;
pub use policy::{
    ClassificationPolicy, DEFAULT_NOT_DONE_MARKERS, DEFAULT_NUMERIC_DATE_THRESHOLD,
    DEFAULT_PENDING_MARKERS,
};
pub use report::TrainingReport;
pub use router::{training_router, CompanyRequest, PersonRequest, ReportRequest};
pub use service::{RosterUpload, TrainingService};

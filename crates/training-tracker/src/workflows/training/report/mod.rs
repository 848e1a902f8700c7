mod summary;
pub mod views;

pub use summary::{
    aggregate, aggregate_by, aggregate_total, roster_options, GroupAggregate, GroupKey,
    TrainingReport, NO_MATCH_NOTICE,
};

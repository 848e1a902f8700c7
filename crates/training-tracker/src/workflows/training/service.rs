use std::io::Cursor;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::cache::{RosterCache, RosterSource};
use super::domain::Roster;
use super::export::to_csv_string;
use super::filter::RosterFilter;
use super::policy::ClassificationPolicy;
use super::report::views::{
    CompanyView, DashboardView, ListingRow, LookupField, PersonDetailView, PersonLookup,
    RosterOptions,
};
use super::report::{roster_options, TrainingReport};
use crate::error::AppError;
use crate::workflows::roster::RosterImporter;

/// Roster sent inline with a request instead of reading the configured source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RosterUpload {
    #[serde(default)]
    pub roster_csv: Option<String>,
    /// Header offset of the inline CSV; defaults to the configured offset.
    #[serde(default)]
    pub header_row: Option<usize>,
}

impl RosterUpload {
    pub fn csv(contents: impl Into<String>, header_row: usize) -> Self {
        Self {
            roster_csv: Some(contents.into()),
            header_row: Some(header_row),
        }
    }
}

/// Serves every roster view from a cached source under one classification policy.
pub struct TrainingService<S> {
    cache: RosterCache<S>,
    importer: RosterImporter,
    policy: ClassificationPolicy,
}

impl<S: RosterSource> TrainingService<S> {
    pub fn new(source: S, importer: RosterImporter, policy: ClassificationPolicy) -> Self {
        Self {
            cache: RosterCache::new(source),
            importer,
            policy,
        }
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &RosterCache<S> {
        &self.cache
    }

    pub fn roster(&self, upload: &RosterUpload) -> Result<Arc<Roster>, AppError> {
        match upload.roster_csv.as_deref() {
            Some(contents) => {
                let importer = upload
                    .header_row
                    .map(RosterImporter::new)
                    .unwrap_or(self.importer);
                let roster = importer
                    .import_reader(Cursor::new(contents.as_bytes()))
                    .map_err(AppError::Upload)?;
                info!(records = roster.len(), "uploaded roster parsed");
                Ok(Arc::new(roster))
            }
            None => Ok(self.cache.get()?),
        }
    }

    pub fn options(&self, upload: &RosterUpload) -> Result<RosterOptions, AppError> {
        let roster = self.roster(upload)?;
        Ok(roster_options(&roster))
    }

    pub fn dashboard(
        &self,
        filter: &RosterFilter,
        upload: &RosterUpload,
    ) -> Result<DashboardView, AppError> {
        let roster = self.roster(upload)?;
        Ok(TrainingReport::build(&roster, filter, &self.policy).dashboard())
    }

    pub fn listing(
        &self,
        filter: &RosterFilter,
        upload: &RosterUpload,
    ) -> Result<Vec<ListingRow>, AppError> {
        let roster = self.roster(upload)?;
        Ok(TrainingReport::build(&roster, filter, &self.policy).listing())
    }

    pub fn person(
        &self,
        filter: &RosterFilter,
        lookup: &PersonLookup,
        upload: &RosterUpload,
    ) -> Result<PersonDetailView, AppError> {
        let roster = self.roster(upload)?;
        TrainingReport::build(&roster, filter, &self.policy)
            .person(lookup)
            .ok_or_else(|| {
                let field = match lookup.by {
                    LookupField::Id => "id",
                    LookupField::Name => "name",
                };
                AppError::NotFound(format!("person with {field} '{}'", lookup.value.trim()))
            })
    }

    pub fn company(
        &self,
        filter: &RosterFilter,
        company: &str,
        upload: &RosterUpload,
    ) -> Result<CompanyView, AppError> {
        let roster = self.roster(upload)?;
        TrainingReport::build(&roster, filter, &self.policy)
            .company(company)
            .ok_or_else(|| AppError::NotFound(format!("company '{company}'")))
    }

    pub fn export_csv(
        &self,
        filter: &RosterFilter,
        upload: &RosterUpload,
    ) -> Result<String, AppError> {
        let roster = self.roster(upload)?;
        let report = TrainingReport::build(&roster, filter, &self.policy);
        Ok(to_csv_string(report.records())?)
    }

    /// Drops the cached roster and reads the source again.
    pub fn refresh(&self) -> Result<usize, AppError> {
        self.cache.invalidate();
        Ok(self.cache.get()?.len())
    }
}

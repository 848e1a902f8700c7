use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::cache::RosterSource;
use super::filter::RosterFilter;
use super::report::views::{
    CompanyView, DashboardView, ListingRow, PersonDetailView, PersonLookup, RosterOptions,
};
use super::service::{RosterUpload, TrainingService};
use crate::error::AppError;

const EXPORT_FILENAME: &str = "registro_ta_ec_filtrado.csv";

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub filter: RosterFilter,
    #[serde(flatten)]
    pub upload: RosterUpload,
}

#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    #[serde(default)]
    pub filter: RosterFilter,
    pub lookup: PersonLookup,
    #[serde(flatten)]
    pub upload: RosterUpload,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    #[serde(default)]
    pub filter: RosterFilter,
    pub company: String,
    #[serde(flatten)]
    pub upload: RosterUpload,
}

/// Router builder exposing the dashboard, lookups and export.
pub fn training_router<S>(service: Arc<TrainingService<S>>) -> Router
where
    S: RosterSource + 'static,
{
    Router::new()
        .route("/api/v1/training/options", get(options_handler::<S>))
        .route("/api/v1/training/dashboard", post(dashboard_handler::<S>))
        .route("/api/v1/training/listing", post(listing_handler::<S>))
        .route("/api/v1/training/person", post(person_handler::<S>))
        .route("/api/v1/training/company", post(company_handler::<S>))
        .route("/api/v1/training/export", post(export_handler::<S>))
        .route("/api/v1/training/refresh", post(refresh_handler::<S>))
        .with_state(service)
}

/// Roster parsing touches the filesystem, so it runs off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

pub(crate) async fn options_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
) -> Result<Json<RosterOptions>, AppError> {
    let options = blocking(move || service.options(&RosterUpload::default())).await?;
    Ok(Json(options))
}

pub(crate) async fn dashboard_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let view = blocking(move || service.dashboard(&request.filter, &request.upload)).await?;
    Ok(Json(view))
}

pub(crate) async fn listing_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Vec<ListingRow>>, AppError> {
    let rows = blocking(move || service.listing(&request.filter, &request.upload)).await?;
    Ok(Json(rows))
}

pub(crate) async fn person_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
    Json(request): Json<PersonRequest>,
) -> Result<Json<PersonDetailView>, AppError> {
    let view = blocking(move || service.person(&request.filter, &request.lookup, &request.upload))
        .await?;
    Ok(Json(view))
}

pub(crate) async fn company_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<CompanyView>, AppError> {
    let view =
        blocking(move || service.company(&request.filter, &request.company, &request.upload))
            .await?;
    Ok(Json(view))
}

pub(crate) async fn export_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let csv = blocking(move || service.export_csv(&request.filter, &request.upload)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    ))
}

pub(crate) async fn refresh_handler<S: RosterSource + 'static>(
    State(service): State<Arc<TrainingService<S>>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let records = blocking(move || service.refresh()).await?;
    Ok(Json(json!({ "status": "reloaded", "records": records })))
}

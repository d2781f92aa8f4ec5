use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::export::{content_disposition, CSV_CONTENT_TYPE};
use crate::models::{
    CitySummary, ColumnDescription, DailyPoint, DatasetMetadata, Distribution, PeriodAggregate,
    SourceReport, SourceStatus, WasteRecord,
};
use crate::services::{ReportError, ReportService};

#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
    /// Source problems to show next to the city selector
    pub warnings: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_cities,
        get_summary,
        get_monthly,
        get_yearly,
        get_daily,
        get_records,
        get_distribution,
        download_csv,
        get_metadata
    ),
    components(schemas(
        HealthResponse,
        CitiesResponse,
        CitySummary,
        PeriodAggregate,
        DailyPoint,
        Distribution,
        WasteRecord,
        DatasetMetadata,
        SourceReport,
        SourceStatus,
        ColumnDescription
    )),
    tags((name = "waste", description = "City waste collection reports"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/cities", get(list_cities))
        .route("/cities/{city}/summary", get(get_summary))
        .route("/cities/{city}/monthly", get(get_monthly))
        .route("/cities/{city}/yearly", get(get_yearly))
        .route("/cities/{city}/daily", get(get_daily))
        .route("/cities/{city}/records", get(get_records))
        .route("/cities/{city}/distribution", get(get_distribution))
        .route("/cities/{city}/download", get(download_csv))
        .route("/metadata", get(get_metadata))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

fn status_for(city: &str, e: ReportError) -> StatusCode {
    match e {
        ReportError::UnknownCity(_) => {
            warn!("City {} is not configured", city);
            StatusCode::NOT_FOUND
        }
        ReportError::Export(e) => {
            error!("Failed to export data for {}: {}", city, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "waste",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "waste",
    responses((status = 200, description = "Selectable cities and source warnings", body = CitiesResponse))
)]
#[instrument(skip(state))]
async fn list_cities(State(state): State<AppState>) -> Json<CitiesResponse> {
    let response = CitiesResponse {
        cities: state.report_service.cities(),
        warnings: state.report_service.warnings(),
    };

    info!(
        "Listing {} cities ({} source warnings)",
        response.cities.len(),
        response.warnings.len()
    );

    Json(response)
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/summary",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Total, mean and day count", body = CitySummary),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_summary(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CitySummary>, StatusCode> {
    debug!("Computing summary for {}", city);
    let summary = state
        .report_service
        .summary(&city)
        .map_err(|e| status_for(&city, e))?;

    info!(
        "Summary for {}: {} records over {} days, total {:.0} kg",
        city, summary.record_count, summary.distinct_days, summary.total_kg
    );

    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/monthly",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Monthly totals, oldest first", body = [PeriodAggregate]),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_monthly(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Vec<PeriodAggregate>>, StatusCode> {
    let monthly = state
        .report_service
        .monthly(&city)
        .map_err(|e| status_for(&city, e))?;

    info!("Retrieved {} monthly buckets for {}", monthly.len(), city);
    Ok(Json(monthly))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/yearly",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Yearly totals, oldest first", body = [PeriodAggregate]),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_yearly(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Vec<PeriodAggregate>>, StatusCode> {
    let yearly = state
        .report_service
        .yearly(&city)
        .map_err(|e| status_for(&city, e))?;

    info!("Retrieved {} yearly buckets for {}", yearly.len(), city);
    Ok(Json(yearly))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/daily",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Daily values sorted by date", body = [DailyPoint]),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_daily(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Vec<DailyPoint>>, StatusCode> {
    let daily = state
        .report_service
        .daily(&city)
        .map_err(|e| status_for(&city, e))?;

    debug!("Retrieved {} daily points for {}", daily.len(), city);
    Ok(Json(daily))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/records",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Raw records sorted by date", body = [WasteRecord]),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_records(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Vec<WasteRecord>>, StatusCode> {
    let records = state
        .report_service
        .records(&city)
        .map_err(|e| status_for(&city, e))?;

    debug!("Retrieved {} raw records for {}", records.len(), city);
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/distribution",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "Five-number summary, null when the city has no records", body = Distribution),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn get_distribution(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Option<Distribution>>, StatusCode> {
    let distribution = state
        .report_service
        .distribution(&city)
        .map_err(|e| status_for(&city, e))?;

    if distribution.is_none() {
        debug!("No records for {}, distribution is empty", city);
    }
    Ok(Json(distribution))
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/{city}/download",
    tag = "waste",
    params(("city" = String, Path, description = "City label")),
    responses(
        (status = 200, description = "CSV download (Date,Waste_kg,City)", content_type = "text/csv", body = String),
        (status = 404, description = "City is not configured")
    )
)]
#[instrument(skip(state), fields(city = %city))]
async fn download_csv(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Response, StatusCode> {
    let export = state
        .report_service
        .export_csv(&city)
        .map_err(|e| status_for(&city, e))?;

    info!(
        "Serving {} ({} bytes) for {}",
        export.file_name,
        export.bytes.len(),
        city
    );

    let headers = [
        (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&export.file_name),
        ),
    ];
    Ok((headers, export.bytes).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/metadata",
    tag = "waste",
    responses((status = 200, description = "Sources, date ranges and column glossary", body = DatasetMetadata))
)]
#[instrument(skip(state))]
async fn get_metadata(State(state): State<AppState>) -> Json<DatasetMetadata> {
    let metadata = state.report_service.metadata();
    debug!("Metadata covers {} sources", metadata.sources.len());
    Json(metadata)
}

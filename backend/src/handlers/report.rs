//! HTTP handlers for report endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::report::{GenerateReportRequest, Report};
use crate::services::ReportService;
use crate::AppState;

/// Generate a new report snapshot
pub async fn generate_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<GenerateReportRequest>,
) -> AppResult<(StatusCode, Json<Report>)> {
    let service = ReportService::new(state.db);
    let report = service.generate(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// List all reports, newest first
pub async fn list_reports(State(state): State<AppState>) -> AppResult<Json<Vec<Report>>> {
    let service = ReportService::new(state.db);
    Ok(Json(service.list_reports().await?))
}

/// Get a single report
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Report>> {
    let service = ReportService::new(state.db);
    Ok(Json(service.get_report(id).await?))
}

/// Export a report's medicine rows as CSV
pub async fn export_report_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db);
    let csv_data = service.export_medicine_rows_csv(id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv_data))
}

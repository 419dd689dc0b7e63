//! HTTP handlers for the dashboard

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::dashboard::{DashboardRange, DashboardSummary};
use crate::services::DashboardService;
use crate::AppState;

/// Query parameters for the dashboard summary
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<DashboardRange>,
}

/// Aggregated dashboard figures for a window
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let service = DashboardService::new(state.db);
    let summary = service.summary(params.range.unwrap_or_default()).await?;
    Ok(Json(summary))
}

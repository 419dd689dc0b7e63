//! HTTP handlers for the stock ledger

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::StockLogEntry;
use crate::services::StockService;
use crate::AppState;
use shared::Pagination;

/// Query parameters for listing stock logs
#[derive(Debug, Deserialize)]
pub struct StockLogQuery {
    pub medicine_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List stock ledger entries, newest first, optionally for one medicine
pub async fn list_stock_logs(
    State(state): State<AppState>,
    Query(params): Query<StockLogQuery>,
) -> AppResult<Json<Vec<StockLogEntry>>> {
    let default = Pagination::default();
    let pagination = Pagination {
        page: params.page.unwrap_or(default.page),
        per_page: params.per_page.unwrap_or(default.per_page),
    };

    let service = StockService::new(state.db);
    let logs = match params.medicine_id {
        Some(medicine_id) => service.logs_for_medicine(medicine_id, &pagination).await?,
        None => service.list_logs(&pagination).await?,
    };

    Ok(Json(logs))
}

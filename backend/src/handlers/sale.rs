//! HTTP handlers for sale endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::sale::{CreateSaleRequest, SaleListItem, SaleResponse};
use crate::services::SaleService;
use crate::AppState;

/// List all sales
pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<SaleListItem>>> {
    let service = SaleService::new(state.db);
    Ok(Json(service.list_sales().await?))
}

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleRequest>,
) -> AppResult<(StatusCode, Json<SaleResponse>)> {
    let service = SaleService::new(state.db);
    let sale = service.record_sale(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Get a sale with its items
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SaleResponse>> {
    let service = SaleService::new(state.db);
    Ok(Json(service.get_sale(id).await?))
}

/// List a customer's sales
pub async fn get_sales_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<SaleListItem>>> {
    let service = SaleService::new(state.db);
    Ok(Json(service.sales_by_customer(customer_id).await?))
}

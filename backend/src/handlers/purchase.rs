//! HTTP handlers for purchase and purchase-item endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::purchase::{
    CreatePurchaseRequest, Purchase, PurchaseItem, PurchaseResponse, UpdatePurchaseItemRequest,
    UpdatePurchaseRequest,
};
use crate::services::PurchaseService;
use crate::AppState;

/// List all purchases
pub async fn list_purchases(State(state): State<AppState>) -> AppResult<Json<Vec<Purchase>>> {
    let service = PurchaseService::new(state.db);
    Ok(Json(service.list_purchases().await?))
}

/// Record a purchase (stock is not moved here)
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseRequest>,
) -> AppResult<(StatusCode, Json<PurchaseResponse>)> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .create_purchase(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Get a purchase with its items
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PurchaseResponse>> {
    let service = PurchaseService::new(state.db);
    Ok(Json(service.get_purchase(id).await?))
}

/// Replace a purchase's fields and items (stock is not moved here)
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseRequest>,
) -> AppResult<Json<PurchaseResponse>> {
    let service = PurchaseService::new(state.db);
    Ok(Json(service.update_purchase(id, input).await?))
}

/// Query parameters for listing purchase items
#[derive(Debug, Deserialize)]
pub struct PurchaseItemQuery {
    pub purchase_id: Option<Uuid>,
}

/// List items for a purchase
pub async fn list_purchase_items(
    State(state): State<AppState>,
    Query(params): Query<PurchaseItemQuery>,
) -> AppResult<Json<Vec<PurchaseItem>>> {
    let purchase_id = params.purchase_id.ok_or_else(|| AppError::Validation {
        field: "purchase_id".to_string(),
        message: "purchase_id is required".to_string(),
    })?;

    let service = PurchaseService::new(state.db);
    Ok(Json(service.items_for_purchase(purchase_id).await?))
}

/// Edit a purchase item; the quantity difference moves stock
pub async fn update_purchase_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseItemRequest>,
) -> AppResult<Json<PurchaseItem>> {
    let service = PurchaseService::new(state.db);
    let item = service
        .update_item(item_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(item))
}

/// Delete a purchase item; its quantity is debited from stock
pub async fn delete_purchase_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PurchaseService::new(state.db);
    service.delete_item(item_id, current_user.0.user_id).await?;
    Ok(Json(()))
}

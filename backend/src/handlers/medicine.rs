//! HTTP handlers for medicine catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::medicine::{CreateMedicineRequest, Medicine, UpdateMedicineRequest};
use crate::services::stock::{AdjustStockRequest, StockChangeOutcome};
use crate::services::{MedicineService, StockService};
use crate::AppState;

/// List all medicines
pub async fn list_medicines(State(state): State<AppState>) -> AppResult<Json<Vec<Medicine>>> {
    let service = MedicineService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Get a single medicine
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Medicine>> {
    let service = MedicineService::new(state.db);
    Ok(Json(service.get(id).await?))
}

/// Create a medicine
pub async fn create_medicine(
    State(state): State<AppState>,
    Json(input): Json<CreateMedicineRequest>,
) -> AppResult<Json<Medicine>> {
    let service = MedicineService::new(state.db);
    Ok(Json(service.create(input).await?))
}

/// Update a medicine's catalog fields
pub async fn update_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMedicineRequest>,
) -> AppResult<Json<Medicine>> {
    let service = MedicineService::new(state.db);
    Ok(Json(service.update(id, input).await?))
}

/// Delete a medicine
pub async fn delete_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MedicineService::new(state.db);
    service.delete(id).await?;
    Ok(Json(()))
}

/// Manually adjust a medicine's stock through the reconciliation service
pub async fn adjust_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<AdjustStockRequest>,
) -> AppResult<Json<StockChangeOutcome>> {
    let service = StockService::new(state.db);
    let outcome = service
        .apply_stock_change(
            id,
            input.quantity_change,
            input.change_type,
            Some(current_user.0.user_id),
        )
        .await?;
    Ok(Json(outcome))
}

//! HTTP handlers for supplier endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::supplier::{CreateSupplierRequest, Supplier, UpdateSupplierRequest};
use crate::services::SupplierService;
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierRequest>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.create(input).await?))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSupplierRequest>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    Ok(Json(service.update(id, input).await?))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = SupplierService::new(state.db);
    service.delete(id).await?;
    Ok(Json(()))
}

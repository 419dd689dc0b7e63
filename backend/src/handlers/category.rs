//! HTTP handlers for category endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::services::CategoryService;
use crate::AppState;

/// List all categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.create(input).await?))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.update(id, input).await?))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CategoryService::new(state.db);
    service.delete(id).await?;
    Ok(Json(()))
}

//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use crate::services::CustomerService;
use crate::AppState;

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Get a single customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.get(id).await?))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.create(input).await?))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    Ok(Json(service.update(id, input).await?))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CustomerService::new(state.db);
    service.delete(id).await?;
    Ok(Json(()))
}

//! HTTP handlers for debt endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::debt::{Debt, PayDebtRequest, UpdateDebtRequest};
use crate::services::DebtService;
use crate::AppState;

/// List all debts, soonest due first
pub async fn list_debts(State(state): State<AppState>) -> AppResult<Json<Vec<Debt>>> {
    let service = DebtService::new(state.db);
    Ok(Json(service.list_debts().await?))
}

/// Record a payment towards a debt
pub async fn pay_debt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(debt_id): Path<Uuid>,
    Json(input): Json<PayDebtRequest>,
) -> AppResult<Json<Debt>> {
    let service = DebtService::new(state.db);
    let debt = service
        .pay_debt(debt_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(debt))
}

/// Administratively update a debt's total or due date
pub async fn update_debt(
    State(state): State<AppState>,
    Path(debt_id): Path<Uuid>,
    Json(input): Json<UpdateDebtRequest>,
) -> AppResult<Json<Debt>> {
    let service = DebtService::new(state.db);
    Ok(Json(service.update_debt_terms(debt_id, input).await?))
}

/// Delete a debt
pub async fn delete_debt(
    State(state): State<AppState>,
    Path(debt_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = DebtService::new(state.db);
    service.delete_debt(debt_id).await?;
    Ok(Json(()))
}

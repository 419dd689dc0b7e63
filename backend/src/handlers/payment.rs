//! HTTP handlers for payment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::payment::{CreatePaymentRequest, Payment, PaymentStats};
use crate::services::PaymentService;
use crate::AppState;

/// List all payments
pub async fn list_payments(State(state): State<AppState>) -> AppResult<Json<Vec<Payment>>> {
    let service = PaymentService::new(state.db);
    Ok(Json(service.list_payments().await?))
}

/// Record a payment
pub async fn add_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let service = PaymentService::new(state.db);
    let payment = service.add_payment(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// List a customer's payments
pub async fn get_payments_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<Payment>>> {
    let service = PaymentService::new(state.db);
    Ok(Json(service.payments_by_customer(customer_id).await?))
}

/// Aggregate payment counters
pub async fn get_payment_stats(State(state): State<AppState>) -> AppResult<Json<PaymentStats>> {
    let service = PaymentService::new(state.db);
    Ok(Json(service.stats().await?))
}

//! Payment ledger service
//!
//! Payments are append-only audit entries. Customer payments recorded here
//! settle against the referenced sale through the same debt-reconciliation
//! helper used by the pay-debt endpoint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{generate_payment_reference, PaymentMethod, PaymentType};
use crate::services::debt::settle_against_sale;
use shared::validation::validate_positive_amount;

/// Payment ledger service
#[derive(Clone)]
pub struct PaymentService {
    db: PgPool,
}

/// Payment entry with the customer name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub related_id: Uuid,
    pub payment_type: String,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub reference: String,
    pub paid_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

/// Input for recording a payment
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub customer_id: Uuid,
    /// Sale (or purchase) the payment settles against
    pub related_id: Uuid,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: Decimal,
    #[serde(default)]
    pub method: PaymentMethod,
}

/// Aggregate payment counters
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStats {
    pub total_payments: i64,
    pub today_payments: i64,
    pub total_amount: Decimal,
    pub today_amount: Decimal,
}

const PAYMENT_COLUMNS: &str = r#"
    p.id, p.customer_id, c.name AS customer_name, p.related_id, p.payment_type,
    p.amount, p.method, p.status, p.reference, p.paid_at, p.user_id
"#;

impl PaymentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List payments, newest first
    pub async fn list_payments(&self) -> AppResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            LEFT JOIN customers c ON c.id = p.customer_id
            ORDER BY p.paid_at DESC, p.id DESC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(payments)
    }

    /// Record a payment and settle it against the referenced sale
    pub async fn add_payment(
        &self,
        user_id: Uuid,
        input: CreatePaymentRequest,
    ) -> AppResult<Payment> {
        validate_positive_amount(input.amount)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let customer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(input.customer_id)
                .fetch_one(&mut *tx)
                .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let payment_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO payments (customer_id, related_id, payment_type, amount, method,
                                  reference, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(input.related_id)
        .bind(input.payment_type.as_str())
        .bind(input.amount)
        .bind(input.method.as_str())
        .bind(generate_payment_reference())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        // Customer payments keep the sale and its debt in step; supplier
        // payments are standalone ledger entries.
        if input.payment_type == PaymentType::CustomerPayment {
            settle_against_sale(&mut tx, input.related_id, input.amount, Utc::now()).await?;
        }

        tx.commit().await?;

        self.get_payment(payment_id).await
    }

    /// List a customer's payments, newest first
    pub async fn payments_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Payment>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(customer_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            LEFT JOIN customers c ON c.id = p.customer_id
            WHERE p.customer_id = $1
            ORDER BY p.paid_at DESC, p.id DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(payments)
    }

    /// Aggregate counters for the payments dashboard card
    pub async fn stats(&self) -> AppResult<PaymentStats> {
        let (total_payments, total_amount) = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM payments",
        )
        .fetch_one(&self.db)
        .await?;

        let (today_payments, today_amount) = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM payments WHERE paid_at >= CURRENT_DATE",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(PaymentStats {
            total_payments,
            today_payments,
            total_amount,
            today_amount,
        })
    }

    async fn get_payment(&self, id: Uuid) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            LEFT JOIN customers c ON c.id = p.customer_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment".to_string()))?;

        Ok(payment)
    }
}

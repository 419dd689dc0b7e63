//! Debt reconciliation service
//!
//! A debt mirrors the unpaid balance of exactly one credit sale. Every
//! payment path (the dedicated pay-debt endpoint and the general payments
//! endpoint) funnels through `settle_against_sale`, which mutates the debt
//! and the originating sale together so the two records cannot drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    derive_debt_status, generate_payment_reference, remaining_balance, PaymentMethod, PaymentType,
};
use shared::validation::validate_positive_amount;

/// Debt reconciliation service
#[derive(Clone)]
pub struct DebtService {
    db: PgPool,
}

/// Debt with the customer name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Debt {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub sale_id: Uuid,
    pub total_owed: Decimal,
    pub amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub last_payment_date: Option<DateTime<Utc>>,
}

/// Input for paying towards a debt
#[derive(Debug, Deserialize)]
pub struct PayDebtRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub method: PaymentMethod,
}

/// Input for administratively updating a debt
#[derive(Debug, Deserialize)]
pub struct UpdateDebtRequest {
    pub total_owed: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
}

const DEBT_COLUMNS: &str = r#"
    d.id, d.customer_id, c.name AS customer_name, d.sale_id, d.total_owed,
    d.amount_paid, d.remaining_balance, d.due_date, d.status, d.last_payment_date
"#;

impl DebtService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List debts, soonest due first
    pub async fn list_debts(&self) -> AppResult<Vec<Debt>> {
        let debts = sqlx::query_as::<_, Debt>(&format!(
            r#"
            SELECT {DEBT_COLUMNS}
            FROM debts d
            JOIN customers c ON c.id = d.customer_id
            ORDER BY d.due_date ASC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(debts)
    }

    /// Get a single debt
    pub async fn get_debt(&self, id: Uuid) -> AppResult<Debt> {
        let debt = sqlx::query_as::<_, Debt>(&format!(
            r#"
            SELECT {DEBT_COLUMNS}
            FROM debts d
            JOIN customers c ON c.id = d.customer_id
            WHERE d.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        Ok(debt)
    }

    /// Record a payment towards a debt
    pub async fn pay_debt(
        &self,
        debt_id: Uuid,
        user_id: Uuid,
        input: PayDebtRequest,
    ) -> AppResult<Debt> {
        validate_positive_amount(input.amount)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let (sale_id, customer_id) = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT sale_id, customer_id FROM debts WHERE id = $1",
        )
        .bind(debt_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO payments (customer_id, related_id, payment_type, amount, method,
                                  reference, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer_id)
        .bind(sale_id)
        .bind(PaymentType::CustomerPayment.as_str())
        .bind(input.amount)
        .bind(input.method.as_str())
        .bind(generate_payment_reference())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        settle_against_sale(&mut tx, sale_id, input.amount, Utc::now()).await?;

        tx.commit().await?;

        self.get_debt(debt_id).await
    }

    /// Administrative override of a debt's total or due date.
    ///
    /// Balance and status are recomputed from the new values; they are never
    /// settable directly.
    pub async fn update_debt_terms(
        &self,
        debt_id: Uuid,
        input: UpdateDebtRequest,
    ) -> AppResult<Debt> {
        let (total_owed, amount_paid, due_date) =
            sqlx::query_as::<_, (Decimal, Decimal, DateTime<Utc>)>(
                "SELECT total_owed, amount_paid, due_date FROM debts WHERE id = $1",
            )
            .bind(debt_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Debt".to_string()))?;

        let new_total = input.total_owed.unwrap_or(total_owed);
        let new_due = input.due_date.unwrap_or(due_date);

        if new_total < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "total_owed".to_string(),
                message: "Total owed cannot be negative".to_string(),
            });
        }

        let new_remaining = remaining_balance(new_total, amount_paid);
        let new_status = derive_debt_status(new_total, amount_paid, new_due, Utc::now());

        sqlx::query(
            r#"
            UPDATE debts
            SET total_owed = $2, due_date = $3, remaining_balance = $4, status = $5
            WHERE id = $1
            "#,
        )
        .bind(debt_id)
        .bind(new_total)
        .bind(new_due)
        .bind(new_remaining)
        .bind(new_status.as_str())
        .execute(&self.db)
        .await?;

        self.get_debt(debt_id).await
    }

    /// Delete a debt
    pub async fn delete_debt(&self, debt_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM debts WHERE id = $1")
            .bind(debt_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Debt".to_string()));
        }

        Ok(())
    }
}

/// Apply a customer payment against the sale it settles.
///
/// Increments the debt tied to the sale (when one exists), recomputes its
/// balance and derived status, and mirrors the new amounts onto the sale
/// itself. Called from both the pay-debt and the general add-payment flows,
/// inside their transactions.
pub(crate) async fn settle_against_sale(
    tx: &mut Transaction<'_, Postgres>,
    sale_id: Uuid,
    amount: Decimal,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let debt = sqlx::query_as::<_, (Uuid, Uuid, Decimal, Decimal, DateTime<Utc>)>(
        r#"
        UPDATE debts
        SET amount_paid = amount_paid + $2, last_payment_date = $3
        WHERE sale_id = $1
        RETURNING id, customer_id, total_owed, amount_paid, due_date
        "#,
    )
    .bind(sale_id)
    .bind(amount)
    .bind(now)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some((debt_id, customer_id, total_owed, amount_paid, due_date)) = debt {
        let new_remaining = remaining_balance(total_owed, amount_paid);
        let new_status = derive_debt_status(total_owed, amount_paid, due_date, now);

        sqlx::query("UPDATE debts SET remaining_balance = $2, status = $3 WHERE id = $1")
            .bind(debt_id)
            .bind(new_remaining)
            .bind(new_status.as_str())
            .execute(&mut **tx)
            .await?;

        // Best-effort collection reminder; never blocks the payment itself
        if new_remaining > Decimal::ZERO {
            tracing::info!(
                %debt_id,
                %customer_id,
                remaining = %new_remaining,
                "payment reminder: customer still owes on this debt"
            );
        }
    }

    sqlx::query(
        r#"
        UPDATE sales
        SET amount_paid = amount_paid + $2, balance = total_amount - amount_paid - $2
        WHERE id = $1
        "#,
    )
    .bind(sale_id)
    .bind(amount)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

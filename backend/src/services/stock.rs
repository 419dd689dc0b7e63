//! Stock reconciliation service
//!
//! All stock movement goes through `apply_stock_change`: the medicine's
//! quantity and the stock ledger entry are written in the same transaction,
//! so the snapshot and the ledger cannot diverge. The quantity update is
//! conditional (`quantity_in_stock + delta >= 0`), which both enforces the
//! non-negative stock invariant and serializes concurrent sales against the
//! same medicine without a separate validate-then-write step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::StockChangeType;
use shared::Pagination;

/// Stock reconciliation service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Result of a committed stock change
#[derive(Debug, Clone, Serialize)]
pub struct StockChangeOutcome {
    pub medicine_id: Uuid,
    pub new_quantity: i32,
    pub log_id: Uuid,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity_change: i32,
    pub change_type: StockChangeType,
}

/// Ledger entry with the medicine name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockLogEntry {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub medicine_name: String,
    pub change_type: String,
    pub quantity_change: i32,
    pub user_id: Option<Uuid>,
    pub logged_at: DateTime<Utc>,
}

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a stock delta to a medicine and append the matching ledger
    /// entry, atomically.
    pub async fn apply_stock_change(
        &self,
        medicine_id: Uuid,
        quantity_change: i32,
        change_type: StockChangeType,
        user_id: Option<Uuid>,
    ) -> AppResult<StockChangeOutcome> {
        let mut tx = self.db.begin().await?;
        let outcome =
            Self::apply_in_tx(&mut tx, medicine_id, quantity_change, change_type, user_id).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Apply a stock delta inside an existing transaction.
    ///
    /// Used directly by the sale and purchase-item flows so their stock
    /// movements commit or roll back with the rest of their writes.
    pub(crate) async fn apply_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        medicine_id: Uuid,
        quantity_change: i32,
        change_type: StockChangeType,
        user_id: Option<Uuid>,
    ) -> AppResult<StockChangeOutcome> {
        if quantity_change == 0 {
            return Err(AppError::Validation {
                field: "quantity_change".to_string(),
                message: "Quantity change cannot be zero".to_string(),
            });
        }

        // Conditional update: refuses any change that would take the stock
        // below zero, under the row lock, so concurrent decrements cannot
        // both pass a stale check.
        let new_quantity = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE medicines
            SET quantity_in_stock = quantity_in_stock + $2
            WHERE id = $1 AND quantity_in_stock + $2 >= 0
            RETURNING quantity_in_stock
            "#,
        )
        .bind(medicine_id)
        .bind(quantity_change)
        .fetch_optional(&mut **tx)
        .await?;

        let new_quantity = match new_quantity {
            Some(q) => q,
            None => {
                // Distinguish a missing medicine from a refused decrement
                let name = sqlx::query_scalar::<_, String>(
                    "SELECT name FROM medicines WHERE id = $1",
                )
                .bind(medicine_id)
                .fetch_optional(&mut **tx)
                .await?;

                return match name {
                    Some(name) => Err(AppError::InsufficientStock(format!(
                        "Stock for {} cannot go below zero",
                        name
                    ))),
                    None => Err(AppError::NotFound("Medicine".to_string())),
                };
            }
        };

        let log_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_logs (medicine_id, change_type, quantity_change, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(medicine_id)
        .bind(change_type.as_str())
        .bind(quantity_change)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        tracing::debug!(
            %medicine_id,
            quantity_change,
            change_type = change_type.as_str(),
            new_quantity,
            "stock change applied"
        );

        Ok(StockChangeOutcome {
            medicine_id,
            new_quantity,
            log_id,
        })
    }

    /// List ledger entries, newest first
    pub async fn list_logs(&self, pagination: &Pagination) -> AppResult<Vec<StockLogEntry>> {
        let logs = sqlx::query_as::<_, StockLogEntry>(
            r#"
            SELECT sl.id, sl.medicine_id, m.name AS medicine_name, sl.change_type,
                   sl.quantity_change, sl.user_id, sl.logged_at
            FROM stock_logs sl
            JOIN medicines m ON m.id = sl.medicine_id
            ORDER BY sl.logged_at DESC, sl.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// List ledger entries for one medicine, newest first
    pub async fn logs_for_medicine(
        &self,
        medicine_id: Uuid,
        pagination: &Pagination,
    ) -> AppResult<Vec<StockLogEntry>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM medicines WHERE id = $1)",
        )
        .bind(medicine_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Medicine".to_string()));
        }

        let logs = sqlx::query_as::<_, StockLogEntry>(
            r#"
            SELECT sl.id, sl.medicine_id, m.name AS medicine_name, sl.change_type,
                   sl.quantity_change, sl.user_id, sl.logged_at
            FROM stock_logs sl
            JOIN medicines m ON m.id = sl.medicine_id
            WHERE sl.medicine_id = $1
            ORDER BY sl.logged_at DESC, sl.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(medicine_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }
}

//! Supplier catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

impl SupplierService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, address, created_at FROM suppliers ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    pub async fn create(&self, input: CreateSupplierRequest) -> AppResult<Supplier> {
        input.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, contact, address, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    pub async fn update(&self, id: Uuid, input: UpdateSupplierRequest) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = COALESCE($2, name),
                contact = COALESCE($3, contact),
                address = COALESCE($4, address)
            WHERE id = $1
            RETURNING id, name, contact, address, created_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}

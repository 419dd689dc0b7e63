//! Customer catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, created_at FROM customers ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    pub async fn create(&self, input: CreateCustomerRequest) -> AppResult<Customer> {
        input.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, address, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, input: UpdateCustomerRequest) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address)
            WHERE id = $1
            RETURNING id, name, phone, address, created_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }
}

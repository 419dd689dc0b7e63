//! Medicine catalog service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::validation::validate_price;

/// Medicine catalog service
#[derive(Clone)]
pub struct MedicineService {
    db: PgPool,
}

/// Medicine record with category and supplier names resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub quantity_in_stock: i32,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub expiry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a medicine
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMedicineRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    #[serde(default)]
    pub quantity_in_stock: i32,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub expiry_date: NaiveDate,
}

/// Input for updating a medicine
#[derive(Debug, Deserialize)]
pub struct UpdateMedicineRequest {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub buying_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
}

const MEDICINE_COLUMNS: &str = r#"
    m.id, m.name, m.category_id, c.name AS category_name,
    m.supplier_id, s.name AS supplier_name,
    m.quantity_in_stock, m.buying_price, m.selling_price,
    m.expiry_date, m.created_at
"#;

impl MedicineService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all medicines with their category and supplier names
    pub async fn list(&self) -> AppResult<Vec<Medicine>> {
        let medicines = sqlx::query_as::<_, Medicine>(&format!(
            r#"
            SELECT {MEDICINE_COLUMNS}
            FROM medicines m
            LEFT JOIN categories c ON c.id = m.category_id
            LEFT JOIN suppliers s ON s.id = m.supplier_id
            ORDER BY m.name
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(medicines)
    }

    /// Get a single medicine
    pub async fn get(&self, id: Uuid) -> AppResult<Medicine> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!(
            r#"
            SELECT {MEDICINE_COLUMNS}
            FROM medicines m
            LEFT JOIN categories c ON c.id = m.category_id
            LEFT JOIN suppliers s ON s.id = m.supplier_id
            WHERE m.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Medicine".to_string()))?;

        Ok(medicine)
    }

    /// Create a medicine
    pub async fn create(&self, input: CreateMedicineRequest) -> AppResult<Medicine> {
        input.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_price(input.buying_price).map_err(|e| AppError::Validation {
            field: "buying_price".to_string(),
            message: e.to_string(),
        })?;
        validate_price(input.selling_price).map_err(|e| AppError::Validation {
            field: "selling_price".to_string(),
            message: e.to_string(),
        })?;
        if input.quantity_in_stock < 0 {
            return Err(AppError::Validation {
                field: "quantity_in_stock".to_string(),
                message: "Stock cannot be negative".to_string(),
            });
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO medicines (name, category_id, supplier_id, quantity_in_stock,
                                   buying_price, selling_price, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(input.quantity_in_stock)
        .bind(input.buying_price)
        .bind(input.selling_price)
        .bind(input.expiry_date)
        .fetch_one(&self.db)
        .await?;

        self.get(id).await
    }

    /// Update a medicine's catalog fields.
    ///
    /// Stock is deliberately not updatable here; all quantity changes go
    /// through the stock reconciliation service so the ledger stays complete.
    pub async fn update(&self, id: Uuid, input: UpdateMedicineRequest) -> AppResult<Medicine> {
        if let Some(price) = input.buying_price {
            validate_price(price).map_err(|e| AppError::Validation {
                field: "buying_price".to_string(),
                message: e.to_string(),
            })?;
        }
        if let Some(price) = input.selling_price {
            validate_price(price).map_err(|e| AppError::Validation {
                field: "selling_price".to_string(),
                message: e.to_string(),
            })?;
        }

        let updated = sqlx::query(
            r#"
            UPDATE medicines
            SET name = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                supplier_id = COALESCE($4, supplier_id),
                buying_price = COALESCE($5, buying_price),
                selling_price = COALESCE($6, selling_price),
                expiry_date = COALESCE($7, expiry_date)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .bind(input.buying_price)
        .bind(input.selling_price)
        .bind(input.expiry_date)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Medicine".to_string()));
        }

        self.get(id).await
    }

    /// Delete a medicine
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM medicines WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Medicine".to_string()));
        }

        Ok(())
    }
}

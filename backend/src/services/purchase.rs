//! Purchase service
//!
//! Creating or replacing a purchase records the order and its items only;
//! stock is NOT moved at that point. Stock enters the ledger through
//! purchase-item edits and deletions (and manual adjustments), which go
//! through the stock reconciliation service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PurchaseStatus, StockChangeType};
use crate::services::stock::StockService;
use shared::validation::{validate_price, validate_quantity};

/// Purchase service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// One line of a purchase request
#[derive(Debug, Deserialize)]
pub struct PurchaseItemInput {
    pub medicine_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Input for creating a purchase
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    pub supplier_id: Uuid,
    #[serde(default)]
    pub status: PurchaseStatus,
    pub items: Vec<PurchaseItemInput>,
}

/// Input for updating a purchase; items replace the existing set
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseRequest {
    pub supplier_id: Option<Uuid>,
    pub status: Option<PurchaseStatus>,
    pub items: Vec<PurchaseItemInput>,
}

/// Input for editing a single purchase item
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseItemRequest {
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Purchase with the supplier name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub user_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub status: String,
    pub purchase_date: DateTime<Utc>,
}

/// Purchase item with the medicine name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub medicine_id: Uuid,
    pub medicine_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Purchase with its items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

const PURCHASE_COLUMNS: &str = r#"
    p.id, p.supplier_id, s.name AS supplier_name, p.user_id, p.total_amount,
    p.status, p.purchase_date
"#;

const PURCHASE_ITEM_COLUMNS: &str = r#"
    pi.id, pi.purchase_id, pi.medicine_id, m.name AS medicine_name,
    pi.quantity, pi.unit_price, pi.subtotal
"#;

impl PurchaseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List purchases, newest first
    pub async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchases p
            JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.purchase_date DESC, p.id DESC
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }

    /// Get a purchase with its items
    pub async fn get_purchase(&self, id: Uuid) -> AppResult<PurchaseResponse> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchases p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let items = self.items_for_purchase(id).await?;

        Ok(PurchaseResponse { purchase, items })
    }

    /// Record a purchase and its items without touching stock
    pub async fn create_purchase(
        &self,
        user_id: Uuid,
        input: CreatePurchaseRequest,
    ) -> AppResult<PurchaseResponse> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one item is required".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let supplier_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(input.supplier_id)
                .fetch_one(&mut *tx)
                .await?;

        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let total_amount = Self::validate_items(&input.items)?;

        let purchase_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchases (supplier_id, user_id, total_amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(input.supplier_id)
        .bind(user_id)
        .bind(total_amount)
        .bind(input.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, purchase_id, &input.items).await?;

        tx.commit().await?;

        self.get_purchase(purchase_id).await
    }

    /// Replace a purchase's fields and items, still without touching stock
    pub async fn update_purchase(
        &self,
        id: Uuid,
        input: UpdatePurchaseRequest,
    ) -> AppResult<PurchaseResponse> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one item is required".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM purchases WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        let total_amount = Self::validate_items(&input.items)?;

        sqlx::query(
            r#"
            UPDATE purchases
            SET supplier_id = COALESCE($2, supplier_id),
                status = COALESCE($3, status),
                total_amount = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.supplier_id)
        .bind(input.status.map(|s| s.as_str()))
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_items(&mut tx, id, &input.items).await?;

        tx.commit().await?;

        self.get_purchase(id).await
    }

    /// List items for a purchase
    pub async fn items_for_purchase(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        let items = sqlx::query_as::<_, PurchaseItem>(&format!(
            r#"
            SELECT {PURCHASE_ITEM_COLUMNS}
            FROM purchase_items pi
            JOIN medicines m ON m.id = pi.medicine_id
            WHERE pi.purchase_id = $1
            ORDER BY pi.id
            "#
        ))
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Edit one purchase item; the quantity difference moves stock through
    /// the reconciliation service
    pub async fn update_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        input: UpdatePurchaseItemRequest,
    ) -> AppResult<PurchaseItem> {
        validate_quantity(input.quantity).map_err(|e| AppError::Validation {
            field: "quantity".to_string(),
            message: e.to_string(),
        })?;
        validate_price(input.unit_price).map_err(|e| AppError::Validation {
            field: "unit_price".to_string(),
            message: e.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let (medicine_id, old_quantity) = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT medicine_id, quantity FROM purchase_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase item".to_string()))?;

        let quantity_diff = input.quantity - old_quantity;
        if quantity_diff != 0 {
            StockService::apply_in_tx(
                &mut tx,
                medicine_id,
                quantity_diff,
                StockChangeType::UpdatePurchase,
                Some(user_id),
            )
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE purchase_items
            SET quantity = $2, unit_price = $3, subtotal = $4
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.unit_price * Decimal::from(input.quantity))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let item = sqlx::query_as::<_, PurchaseItem>(&format!(
            r#"
            SELECT {PURCHASE_ITEM_COLUMNS}
            FROM purchase_items pi
            JOIN medicines m ON m.id = pi.medicine_id
            WHERE pi.id = $1
            "#
        ))
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Delete one purchase item; its quantity is debited from stock through
    /// the reconciliation service
    pub async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let (medicine_id, quantity) = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT medicine_id, quantity FROM purchase_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase item".to_string()))?;

        StockService::apply_in_tx(
            &mut tx,
            medicine_id,
            -quantity,
            StockChangeType::UpdatePurchase,
            Some(user_id),
        )
        .await?;

        sqlx::query("DELETE FROM purchase_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    fn validate_items(items: &[PurchaseItemInput]) -> AppResult<Decimal> {
        let mut total = Decimal::ZERO;
        for item in items {
            validate_quantity(item.quantity).map_err(|e| AppError::Validation {
                field: "quantity".to_string(),
                message: e.to_string(),
            })?;
            validate_price(item.unit_price).map_err(|e| AppError::Validation {
                field: "unit_price".to_string(),
                message: e.to_string(),
            })?;
            total += item.unit_price * Decimal::from(item.quantity);
        }
        Ok(total)
    }

    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        purchase_id: Uuid,
        items: &[PurchaseItemInput],
    ) -> AppResult<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (purchase_id, medicine_id, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(purchase_id)
            .bind(item.medicine_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.unit_price * Decimal::from(item.quantity))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

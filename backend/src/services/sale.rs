//! Sale recording service
//!
//! Recording a sale writes the sale and its items, debits stock through the
//! reconciliation service, and opens the payment/debt records the settlement
//! plan calls for, all in a single transaction. A refused stock decrement
//! anywhere in the item list rolls the whole sale back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    generate_payment_reference, sale_total, settle_sale, PaymentMethod, PaymentType, SaleType,
    StockChangeType,
};
use crate::services::stock::StockService;
use shared::validation::{validate_amount_paid, validate_price, validate_quantity};

/// Sale recording service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// One line of a sale request
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub medicine_id: Uuid,
    pub quantity: i32,
    /// Defaults to the medicine's current selling price
    pub unit_price: Option<Decimal>,
}

/// Input for recording a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: Uuid,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub sale_type: SaleType,
    pub amount_paid: Option<Decimal>,
    /// Defaults to now
    pub sale_date: Option<DateTime<Utc>>,
}

/// Sale line with the name and price snapshot taken at sale time
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleItemRow {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Full sale with items
#[derive(Debug, Clone, Serialize)]
pub struct SaleResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub user_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
    pub sale_type: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItemRow>,
}

/// Sale summary for list views
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleListItem {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
    pub sale_type: String,
    pub sale_date: DateTime<Utc>,
    pub total_items: i64,
}

#[derive(Debug, FromRow)]
struct SaleHeaderRow {
    id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    user_id: Option<Uuid>,
    total_amount: Decimal,
    amount_paid: Decimal,
    balance: Decimal,
    sale_type: String,
    sale_date: DateTime<Utc>,
}

struct PlannedLine {
    medicine_id: Uuid,
    name: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl SaleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a sale against current stock
    pub async fn record_sale(
        &self,
        user_id: Uuid,
        input: CreateSaleRequest,
    ) -> AppResult<SaleResponse> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one item is required".to_string(),
            });
        }

        let amount_paid = input.amount_paid.unwrap_or(Decimal::ZERO);
        let sale_date = input.sale_date.unwrap_or_else(Utc::now);

        let mut tx = self.db.begin().await?;

        let customer_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM customers WHERE id = $1")
                .bind(input.customer_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        // Resolve and validate every line before writing anything. The
        // stock check here exists to name the offending medicine in the
        // error; the conditional decrement below remains the authority.
        let mut lines: Vec<PlannedLine> = Vec::with_capacity(input.items.len());
        for item in &input.items {
            validate_quantity(item.quantity).map_err(|e| AppError::Validation {
                field: "quantity".to_string(),
                message: e.to_string(),
            })?;

            let (name, in_stock, selling_price) = sqlx::query_as::<_, (String, i32, Decimal)>(
                "SELECT name, quantity_in_stock, selling_price FROM medicines WHERE id = $1",
            )
            .bind(item.medicine_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Medicine {}", item.medicine_id)))?;

            if item.quantity > in_stock {
                return Err(AppError::InsufficientStock(format!(
                    "Quantity for {} exceeds available stock ({})",
                    name, in_stock
                )));
            }

            let unit_price = item.unit_price.unwrap_or(selling_price);
            validate_price(unit_price).map_err(|e| AppError::Validation {
                field: "unit_price".to_string(),
                message: e.to_string(),
            })?;

            lines.push(PlannedLine {
                medicine_id: item.medicine_id,
                name,
                quantity: item.quantity,
                unit_price,
                subtotal: unit_price * Decimal::from(item.quantity),
            });
        }

        let subtotals: Vec<Decimal> = lines.iter().map(|l| l.subtotal).collect();
        let total_amount = sale_total(&subtotals);
        validate_amount_paid(amount_paid, total_amount)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let settlement = settle_sale(total_amount, amount_paid, sale_date);

        let sale_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO sales (customer_id, user_id, total_amount, amount_paid, balance,
                               sale_type, sale_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(user_id)
        .bind(total_amount)
        .bind(amount_paid)
        .bind(settlement.balance)
        .bind(input.sale_type.as_str())
        .bind(sale_date)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, medicine_id, name, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(sale_id)
            .bind(line.medicine_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .execute(&mut *tx)
            .await?;

            StockService::apply_in_tx(
                &mut tx,
                line.medicine_id,
                -line.quantity,
                StockChangeType::Sale,
                Some(user_id),
            )
            .await?;
        }

        if let Some(amount) = settlement.payment_amount {
            sqlx::query(
                r#"
                INSERT INTO payments (customer_id, related_id, payment_type, amount, method,
                                      reference, user_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(input.customer_id)
            .bind(sale_id)
            .bind(PaymentType::CustomerPayment.as_str())
            .bind(amount)
            .bind(PaymentMethod::Cash.as_str())
            .bind(generate_payment_reference())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(debt) = &settlement.debt {
            sqlx::query(
                r#"
                INSERT INTO debts (customer_id, sale_id, total_owed, amount_paid,
                                   remaining_balance, due_date, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(input.customer_id)
            .bind(sale_id)
            .bind(debt.total_owed)
            .bind(debt.amount_paid)
            .bind(debt.remaining_balance)
            .bind(debt.due_date)
            .bind(debt.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %sale_id,
            customer = %customer_name,
            %total_amount,
            %amount_paid,
            "sale recorded"
        );

        self.get_sale(sale_id).await
    }

    /// List sales, newest first
    pub async fn list_sales(&self) -> AppResult<Vec<SaleListItem>> {
        let sales = sqlx::query_as::<_, SaleListItem>(
            r#"
            SELECT s.id, s.customer_id, c.name AS customer_name, s.total_amount,
                   s.amount_paid, s.balance, s.sale_type, s.sale_date,
                   COUNT(si.id) AS total_items
            FROM sales s
            JOIN customers c ON c.id = s.customer_id
            LEFT JOIN sale_items si ON si.sale_id = s.id
            GROUP BY s.id, c.name
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Get a sale with its items
    pub async fn get_sale(&self, id: Uuid) -> AppResult<SaleResponse> {
        let header = sqlx::query_as::<_, SaleHeaderRow>(
            r#"
            SELECT s.id, s.customer_id, c.name AS customer_name, s.user_id,
                   s.total_amount, s.amount_paid, s.balance, s.sale_type, s.sale_date
            FROM sales s
            JOIN customers c ON c.id = s.customer_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT id, medicine_id, name, quantity, unit_price, subtotal
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(SaleResponse {
            id: header.id,
            customer_id: header.customer_id,
            customer_name: header.customer_name,
            user_id: header.user_id,
            total_amount: header.total_amount,
            amount_paid: header.amount_paid,
            balance: header.balance,
            sale_type: header.sale_type,
            sale_date: header.sale_date,
            items,
        })
    }

    /// List a customer's sales, newest first
    pub async fn sales_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<SaleListItem>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(customer_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let sales = sqlx::query_as::<_, SaleListItem>(
            r#"
            SELECT s.id, s.customer_id, c.name AS customer_name, s.total_amount,
                   s.amount_paid, s.balance, s.sale_type, s.sale_date,
                   COUNT(si.id) AS total_items
            FROM sales s
            JOIN customers c ON c.id = s.customer_id
            LEFT JOIN sale_items si ON si.sale_id = s.id
            WHERE s.customer_id = $1
            GROUP BY s.id, c.name
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }
}

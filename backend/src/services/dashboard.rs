//! Dashboard metrics service
//!
//! Read-only aggregates for the landing dashboard. All figures are computed
//! from the live tables at request time; nothing here mutates state.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::LOW_STOCK_THRESHOLD;

/// Dashboard metrics service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Reporting window for dashboard aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DashboardRange {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl DashboardRange {
    /// Start of the window, counted back from now
    fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DashboardRange::Daily => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
            DashboardRange::Weekly => now - Duration::days(7),
            DashboardRange::Monthly => now - Duration::days(30),
            DashboardRange::Yearly => now - Duration::days(365),
        }
    }
}

/// Aggregated dashboard figures
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    // Basic counts
    pub medicine_count: i64,
    pub customer_count: i64,

    // Sales in the window
    pub total_sales: i64,
    pub cash_sales: i64,
    pub credit_sales: i64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub active_customers: i64,

    // Stock health
    pub in_stock_count: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,

    // Debts (all time)
    pub total_debt_outstanding: Decimal,
    pub debt_paid: Decimal,
    pub debt_pending: Decimal,
    pub debt_overdue: Decimal,

    // Payments in the window
    pub pending_payments: i64,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard summary for a window
    pub async fn summary(&self, range: DashboardRange) -> AppResult<DashboardSummary> {
        let start = range.start(Utc::now());

        let medicine_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medicines")
                .fetch_one(&self.db)
                .await?;

        let customer_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
                .fetch_one(&self.db)
                .await?;

        let (total_sales, cash_sales, credit_sales, total_revenue, active_customers) =
            sqlx::query_as::<_, (i64, i64, i64, Decimal, i64)>(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE sale_type = 'cash'),
                       COUNT(*) FILTER (WHERE sale_type = 'credit'),
                       COALESCE(SUM(total_amount), 0),
                       COUNT(DISTINCT customer_id)
                FROM sales
                WHERE sale_date >= $1
                "#,
            )
            .bind(start)
            .fetch_one(&self.db)
            .await?;

        // Profit per line item against the medicine's current buying price
        let total_profit = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM((si.unit_price - m.buying_price) * si.quantity), 0)
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            JOIN medicines m ON m.id = si.medicine_id
            WHERE s.sale_date >= $1
            "#,
        )
        .bind(start)
        .fetch_one(&self.db)
        .await?;

        let total_expenses = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM purchases WHERE purchase_date >= $1",
        )
        .bind(start)
        .fetch_one(&self.db)
        .await?;

        let (in_stock_count, low_stock_count, out_of_stock_count) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT COUNT(*) FILTER (WHERE quantity_in_stock >= $1),
                       COUNT(*) FILTER (WHERE quantity_in_stock > 0 AND quantity_in_stock < $1),
                       COUNT(*) FILTER (WHERE quantity_in_stock = 0)
                FROM medicines
                "#,
            )
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.db)
            .await?;

        let (total_debt_outstanding, debt_paid, debt_pending, debt_overdue) =
            sqlx::query_as::<_, (Decimal, Decimal, Decimal, Decimal)>(
                r#"
                SELECT COALESCE(SUM(remaining_balance), 0),
                       COALESCE(SUM(amount_paid), 0),
                       COALESCE(SUM(remaining_balance) FILTER (WHERE status = 'pending'), 0),
                       COALESCE(SUM(remaining_balance) FILTER (WHERE status = 'overdue'), 0)
                FROM debts
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let pending_payments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments WHERE status = 'pending' AND paid_at >= $1",
        )
        .bind(start)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardSummary {
            medicine_count,
            customer_count,
            total_sales,
            cash_sales,
            credit_sales,
            total_revenue,
            total_profit,
            total_expenses,
            net_profit: total_profit - total_expenses,
            active_customers,
            in_stock_count,
            low_stock_count,
            out_of_stock_count,
            total_debt_outstanding,
            debt_paid,
            debt_pending,
            debt_overdue,
            pending_payments,
        })
    }
}

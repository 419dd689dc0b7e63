//! Report generation service
//!
//! Gathers the catalog snapshot and the period's sales totals, hands them to
//! the shared report engine, and persists the computed content as an
//! immutable snapshot row. Reports are never recomputed in place; generating
//! again for the same period inserts a new snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    build_report, CategoryReportRow, ExecutiveSummary, MedicineReportRow, MedicineSnapshot,
    ReportTotals, ReportType, SoldLine,
};
use shared::validation::validate_period;

/// Report generation service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Input for generating a report
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, rename = "type")]
    pub report_type: ReportType,
    #[serde(default)]
    pub include_zero_sales: bool,
}

/// Persisted report snapshot
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub report_type: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub generated_by: Option<Uuid>,
    pub include_zero_sales: bool,
    pub totals: Json<ReportTotals>,
    pub by_medicine: Json<Vec<MedicineReportRow>>,
    pub by_category: Json<Vec<CategoryReportRow>>,
    pub executive_summary: Json<ExecutiveSummary>,
}

const REPORT_COLUMNS: &str = r#"
    id, title, report_type, period_start, period_end, generated_at, generated_by,
    include_zero_sales, totals, by_medicine, by_category, executive_summary
"#;

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Generate and persist a profitability report for a period
    pub async fn generate(
        &self,
        generated_by: Uuid,
        input: GenerateReportRequest,
    ) -> AppResult<Report> {
        validate_period(input.start_date, input.end_date)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let period_start = input.start_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        // Clamp the end of the period to end-of-day
        let period_end = input
            .end_date
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap()
            .and_utc();

        let medicines: Vec<MedicineSnapshot> = sqlx::query_as::<
            _,
            (Uuid, String, Option<Uuid>, Option<String>, i32, Decimal, Decimal),
        >(
            r#"
            SELECT m.id, m.name, m.category_id, c.name, m.quantity_in_stock,
                   m.buying_price, m.selling_price
            FROM medicines m
            LEFT JOIN categories c ON c.id = m.category_id
            ORDER BY m.name
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(
            |(id, name, category_id, category_name, quantity_in_stock, buying_price, selling_price)| {
                MedicineSnapshot {
                    id,
                    name,
                    category_id,
                    category_name,
                    quantity_in_stock,
                    buying_price,
                    selling_price,
                }
            },
        )
        .collect();

        let sold: Vec<SoldLine> = sqlx::query_as::<_, (Uuid, i64, Decimal)>(
            r#"
            SELECT si.medicine_id, SUM(si.quantity), COALESCE(SUM(si.subtotal), 0)
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            WHERE s.sale_date >= $1 AND s.sale_date <= $2
            GROUP BY si.medicine_id
            "#,
        )
        .bind(period_start)
        .bind(period_end)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(medicine_id, sold_qty, sold_revenue)| SoldLine {
            medicine_id,
            sold_qty,
            sold_revenue,
        })
        .collect();

        let content = build_report(&medicines, &sold, input.include_zero_sales);

        let title = format!("Report {} -> {}", input.start_date, input.end_date);

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (title, report_type, period_start, period_end, generated_by,
                                 include_zero_sales, totals, by_medicine, by_category,
                                 executive_summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(&title)
        .bind(input.report_type.as_str())
        .bind(period_start)
        .bind(period_end)
        .bind(generated_by)
        .bind(input.include_zero_sales)
        .bind(Json(&content.totals))
        .bind(Json(&content.by_medicine))
        .bind(Json(&content.by_category))
        .bind(Json(&content.executive_summary))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            report_id = %report.id,
            medicines = content.totals.total_medicines_analyzed,
            revenue = %content.totals.total_revenue,
            "report generated"
        );

        Ok(report)
    }

    /// List reports, newest first
    pub async fn list_reports(&self) -> AppResult<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY generated_at DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(reports)
    }

    /// Get a single report
    pub async fn get_report(&self, id: Uuid) -> AppResult<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Report".to_string()))?;

        Ok(report)
    }

    /// Export a report's medicine rows as CSV
    pub async fn export_medicine_rows_csv(&self, id: Uuid) -> AppResult<String> {
        let report = self.get_report(id).await?;
        Self::export_to_csv(&report.by_medicine.0)
    }

    /// Serialize rows as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

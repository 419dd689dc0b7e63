//! Profitability report engine
//!
//! A report is an immutable snapshot: the backend gathers the raw inputs
//! (medicine catalog state and per-medicine sales totals for the period) and
//! this module computes the full report content as a pure function, so the
//! numbers are testable without a database.
//!
//! Buying cost is valued against the CURRENT stock snapshot, not the stock
//! level at period end. Two reports generated at different times for the
//! same period can therefore differ as stock moves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report period preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
    #[default]
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Daily => "daily",
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
            ReportType::Custom => "custom",
        }
    }
}

/// Profit/loss classification of a medicine or category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitStatus {
    Profit,
    Loss,
    BreakEven,
}

/// Per-medicine performance tier, from profit margin thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    Poor,
}

/// Overall report performance label, from gross margin thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallPerformance {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Catalog state of a medicine at generation time
#[derive(Debug, Clone)]
pub struct MedicineSnapshot {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub quantity_in_stock: i32,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
}

/// Aggregated sales of one medicine within the report period
#[derive(Debug, Clone)]
pub struct SoldLine {
    pub medicine_id: Uuid,
    pub sold_qty: i64,
    pub sold_revenue: Decimal,
}

/// One medicine's row in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineReportRow {
    pub medicine_id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub quantity_in_stock: i32,
    pub sold_qty: i64,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub sold_revenue: Decimal,
    pub total_buying_cost: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub status: ProfitStatus,
    pub performance: PerformanceTier,
    pub recommendation: String,
}

/// Category rollup of medicine rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReportRow {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub sold_qty: i64,
    pub sold_revenue: Decimal,
    pub total_medicine_cost: Decimal,
    pub gross_profit: Decimal,
    pub profit_margin: Decimal,
    pub status: ProfitStatus,
}

/// Report-wide totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_medicines_analyzed: i64,
    pub total_sold_qty: i64,
    pub total_revenue: Decimal,
    pub total_buying_cost: Decimal,
    pub gross_profit: Decimal,
    pub gross_margin: Decimal,
    pub profitable_medicines: i64,
    pub loss_medicines: i64,
    pub break_even_medicines: i64,
}

/// Reference to a medicine in the executive summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub medicine_id: Uuid,
    pub name: String,
    pub profit: Decimal,
    pub profit_margin: Decimal,
}

/// Narrative section of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub top_performers: Vec<SummaryEntry>,
    pub areas_of_concern: Vec<SummaryEntry>,
    pub key_insights: Vec<String>,
    pub overall_performance: OverallPerformance,
}

/// Fully computed report content, persisted verbatim as the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContent {
    pub totals: ReportTotals,
    pub by_medicine: Vec<MedicineReportRow>,
    pub by_category: Vec<CategoryReportRow>,
    pub executive_summary: ExecutiveSummary,
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TOP_MOVERS: usize = 5;

fn margin_of(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue > Decimal::ZERO {
        (profit / revenue * HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

fn status_of(profit: Decimal) -> ProfitStatus {
    if profit > Decimal::ZERO {
        ProfitStatus::Profit
    } else if profit < Decimal::ZERO {
        ProfitStatus::Loss
    } else {
        ProfitStatus::BreakEven
    }
}

/// Tier a medicine by its profit margin: >50% excellent, >25% good,
/// negative poor, anything else average.
pub fn classify_performance(profit_margin: Decimal) -> PerformanceTier {
    if profit_margin > Decimal::from(50) {
        PerformanceTier::Excellent
    } else if profit_margin > Decimal::from(25) {
        PerformanceTier::Good
    } else if profit_margin < Decimal::ZERO {
        PerformanceTier::Poor
    } else {
        PerformanceTier::Average
    }
}

/// Label the whole report by its gross margin
pub fn classify_overall_performance(gross_margin: Decimal) -> OverallPerformance {
    if gross_margin > Decimal::from(50) {
        OverallPerformance::Excellent
    } else if gross_margin > Decimal::from(25) {
        OverallPerformance::Good
    } else if gross_margin > Decimal::ZERO {
        OverallPerformance::Fair
    } else {
        OverallPerformance::Poor
    }
}

fn recommendation_for(row_sold_qty: i64, tier: PerformanceTier) -> String {
    if row_sold_qty == 0 {
        return "No sales in this period. Review demand before restocking.".to_string();
    }
    match tier {
        PerformanceTier::Excellent => {
            "Strong margins. Maintain pricing and keep this medicine stocked.".to_string()
        }
        PerformanceTier::Good => {
            "Healthy performer. Consider promoting to lift volume.".to_string()
        }
        PerformanceTier::Average => {
            "Margins are thin. Review pricing or negotiate supplier cost.".to_string()
        }
        PerformanceTier::Poor => {
            "Revenue does not cover current stock cost. Review pricing or reduce stock."
                .to_string()
        }
    }
}

fn build_insights(totals: &ReportTotals) -> Vec<String> {
    let mut insights = Vec::new();

    if totals.total_sold_qty == 0 {
        insights.push("No sales were recorded in this period.".to_string());
    } else if totals.gross_margin > Decimal::from(50) {
        insights.push(format!(
            "Gross margin of {}% indicates excellent overall profitability.",
            totals.gross_margin
        ));
    } else if totals.gross_margin > Decimal::from(25) {
        insights.push(format!(
            "Gross margin of {}% is healthy across the analyzed period.",
            totals.gross_margin
        ));
    } else {
        insights.push(format!(
            "Gross margin of {}% is below target; review pricing and stock levels.",
            totals.gross_margin
        ));
    }

    if totals.loss_medicines > 0 {
        insights.push(format!(
            "{} of {} medicines are running at a loss against current stock cost.",
            totals.loss_medicines, totals.total_medicines_analyzed
        ));
    }
    if totals.profitable_medicines > 0 {
        insights.push(format!(
            "{} medicines are profitable, contributing {} in revenue overall.",
            totals.profitable_medicines, totals.total_revenue
        ));
    }

    insights
}

/// Compute the full report content for a period.
///
/// `medicines` is the current catalog snapshot (with category names already
/// resolved); `sold` carries per-medicine quantity and revenue sums for sale
/// line items dated within the period. When `include_zero_sales` is false,
/// medicines without sales in the period are omitted.
pub fn build_report(
    medicines: &[MedicineSnapshot],
    sold: &[SoldLine],
    include_zero_sales: bool,
) -> ReportContent {
    let sold_by_medicine: std::collections::HashMap<Uuid, &SoldLine> =
        sold.iter().map(|s| (s.medicine_id, s)).collect();

    let mut by_medicine: Vec<MedicineReportRow> = Vec::new();

    for med in medicines {
        let line = sold_by_medicine.get(&med.id);
        let sold_qty = line.map_or(0, |l| l.sold_qty);
        let sold_revenue = line.map_or(Decimal::ZERO, |l| l.sold_revenue);

        if sold_qty == 0 && !include_zero_sales {
            continue;
        }

        let total_buying_cost = med.buying_price * Decimal::from(med.quantity_in_stock);
        let profit = sold_revenue - total_buying_cost;
        let profit_margin = margin_of(profit, sold_revenue);
        let performance = classify_performance(profit_margin);

        by_medicine.push(MedicineReportRow {
            medicine_id: med.id,
            name: med.name.clone(),
            category_id: med.category_id,
            category_name: med
                .category_name
                .clone()
                .unwrap_or_else(|| "Uncategorized".to_string()),
            quantity_in_stock: med.quantity_in_stock,
            sold_qty,
            buying_price: med.buying_price,
            selling_price: med.selling_price,
            sold_revenue,
            total_buying_cost,
            profit,
            profit_margin,
            status: status_of(profit),
            performance,
            recommendation: recommendation_for(sold_qty, performance),
        });
    }

    by_medicine.sort_by(|a, b| a.name.cmp(&b.name));

    // Category rollup; margins recomputed from category sums
    let mut categories: Vec<CategoryReportRow> = Vec::new();
    for row in &by_medicine {
        let entry = categories
            .iter_mut()
            .find(|c| c.category_id == row.category_id);
        let cat = match entry {
            Some(c) => c,
            None => {
                categories.push(CategoryReportRow {
                    category_id: row.category_id,
                    name: row.category_name.clone(),
                    sold_qty: 0,
                    sold_revenue: Decimal::ZERO,
                    total_medicine_cost: Decimal::ZERO,
                    gross_profit: Decimal::ZERO,
                    profit_margin: Decimal::ZERO,
                    status: ProfitStatus::BreakEven,
                });
                categories.last_mut().expect("just pushed")
            }
        };
        cat.sold_qty += row.sold_qty;
        cat.sold_revenue += row.sold_revenue;
        cat.total_medicine_cost += row.total_buying_cost;
        cat.gross_profit += row.profit;
    }
    for cat in &mut categories {
        cat.profit_margin = margin_of(cat.gross_profit, cat.sold_revenue);
        cat.status = status_of(cat.gross_profit);
    }
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    // Totals
    let total_revenue: Decimal = by_medicine.iter().map(|r| r.sold_revenue).sum();
    let total_buying_cost: Decimal = by_medicine.iter().map(|r| r.total_buying_cost).sum();
    let gross_profit = total_revenue - total_buying_cost;
    let totals = ReportTotals {
        total_medicines_analyzed: by_medicine.len() as i64,
        total_sold_qty: by_medicine.iter().map(|r| r.sold_qty).sum(),
        total_revenue,
        total_buying_cost,
        gross_profit,
        gross_margin: margin_of(gross_profit, total_revenue),
        profitable_medicines: by_medicine
            .iter()
            .filter(|r| r.status == ProfitStatus::Profit)
            .count() as i64,
        loss_medicines: by_medicine
            .iter()
            .filter(|r| r.status == ProfitStatus::Loss)
            .count() as i64,
        break_even_medicines: by_medicine
            .iter()
            .filter(|r| r.status == ProfitStatus::BreakEven)
            .count() as i64,
    };

    // Executive summary
    let mut winners: Vec<&MedicineReportRow> = by_medicine
        .iter()
        .filter(|r| r.profit > Decimal::ZERO)
        .collect();
    winners.sort_by(|a, b| b.profit.cmp(&a.profit));

    let mut losers: Vec<&MedicineReportRow> = by_medicine
        .iter()
        .filter(|r| r.profit < Decimal::ZERO)
        .collect();
    losers.sort_by(|a, b| a.profit.cmp(&b.profit));

    let to_entry = |r: &MedicineReportRow| SummaryEntry {
        medicine_id: r.medicine_id,
        name: r.name.clone(),
        profit: r.profit,
        profit_margin: r.profit_margin,
    };

    let executive_summary = ExecutiveSummary {
        top_performers: winners.iter().take(TOP_MOVERS).map(|r| to_entry(r)).collect(),
        areas_of_concern: losers.iter().take(TOP_MOVERS).map(|r| to_entry(r)).collect(),
        key_insights: build_insights(&totals),
        overall_performance: classify_overall_performance(totals.gross_margin),
    };

    ReportContent {
        totals,
        by_medicine,
        by_category: categories,
        executive_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn med(name: &str, stock: i32, buy: i64, sell: i64) -> MedicineSnapshot {
        MedicineSnapshot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category_id: None,
            category_name: None,
            quantity_in_stock: stock,
            buying_price: dec(buy),
            selling_price: dec(sell),
        }
    }

    #[test]
    fn computes_profit_margin_and_performance() {
        // 4 units sold at 5 while 6 remain in stock at buying price 2:
        // revenue 20, buying cost 12, profit 8, margin 40% -> good
        let m = med("Amoxicillin", 6, 2, 5);
        let sold = vec![SoldLine {
            medicine_id: m.id,
            sold_qty: 4,
            sold_revenue: dec(20),
        }];

        let report = build_report(&[m], &sold, false);
        let row = &report.by_medicine[0];

        assert_eq!(row.total_buying_cost, dec(12));
        assert_eq!(row.profit, dec(8));
        assert_eq!(row.profit_margin, dec(40));
        assert_eq!(row.performance, PerformanceTier::Good);
        assert_eq!(row.status, ProfitStatus::Profit);
    }

    #[test]
    fn zero_sales_period_with_include_zero_sales() {
        let meds = vec![med("Ibuprofen", 10, 3, 6), med("Paracetamol", 4, 1, 2)];

        let report = build_report(&meds, &[], true);

        assert_eq!(report.totals.total_sold_qty, 0);
        assert_eq!(report.totals.total_medicines_analyzed, 2);
        for row in &report.by_medicine {
            assert_eq!(row.sold_qty, 0);
            assert_eq!(row.profit, -row.total_buying_cost);
        }
        assert!(report.executive_summary.top_performers.is_empty());
    }

    #[test]
    fn zero_sales_rows_are_dropped_by_default() {
        let sold_med = med("Aspirin", 2, 1, 3);
        let idle_med = med("Cetirizine", 8, 2, 4);
        let sold = vec![SoldLine {
            medicine_id: sold_med.id,
            sold_qty: 1,
            sold_revenue: dec(3),
        }];

        let report = build_report(&[sold_med, idle_med], &sold, false);

        assert_eq!(report.by_medicine.len(), 1);
        assert_eq!(report.by_medicine[0].name, "Aspirin");
    }

    #[test]
    fn categories_roll_up_and_recompute_margin() {
        let cat = Uuid::new_v4();
        let mut a = med("A", 0, 1, 2);
        let mut b = med("B", 0, 1, 2);
        a.category_id = Some(cat);
        a.category_name = Some("Antibiotics".to_string());
        b.category_id = Some(cat);
        b.category_name = Some("Antibiotics".to_string());

        let sold = vec![
            SoldLine {
                medicine_id: a.id,
                sold_qty: 2,
                sold_revenue: dec(10),
            },
            SoldLine {
                medicine_id: b.id,
                sold_qty: 3,
                sold_revenue: dec(30),
            },
        ];

        let report = build_report(&[a, b], &sold, false);

        assert_eq!(report.by_category.len(), 1);
        let c = &report.by_category[0];
        assert_eq!(c.name, "Antibiotics");
        assert_eq!(c.sold_qty, 5);
        assert_eq!(c.sold_revenue, dec(40));
        // zero stock means zero cost; margin is 100%
        assert_eq!(c.gross_profit, dec(40));
        assert_eq!(c.profit_margin, dec(100));
    }

    #[test]
    fn summary_ranks_top_and_bottom_movers() {
        let meds: Vec<MedicineSnapshot> = (0..7).map(|i| med(&format!("M{}", i), 0, 1, 2)).collect();
        // M0..M5 profitable with increasing revenue, M6 at a loss
        let mut sold: Vec<SoldLine> = meds[..6]
            .iter()
            .enumerate()
            .map(|(i, m)| SoldLine {
                medicine_id: m.id,
                sold_qty: 1,
                sold_revenue: dec((i as i64 + 1) * 10),
            })
            .collect();
        let loser = med("Zz", 100, 5, 1);
        sold.push(SoldLine {
            medicine_id: loser.id,
            sold_qty: 1,
            sold_revenue: dec(1),
        });
        let mut all = meds;
        all.push(loser);

        let report = build_report(&all, &sold, false);
        let summary = &report.executive_summary;

        assert_eq!(summary.top_performers.len(), 5);
        assert_eq!(summary.top_performers[0].profit, dec(60));
        assert_eq!(summary.areas_of_concern.len(), 1);
        assert_eq!(summary.areas_of_concern[0].profit, dec(1) - dec(500));
    }

    #[test]
    fn overall_performance_thresholds() {
        assert_eq!(
            classify_overall_performance(dec(60)),
            OverallPerformance::Excellent
        );
        assert_eq!(
            classify_overall_performance(dec(30)),
            OverallPerformance::Good
        );
        assert_eq!(
            classify_overall_performance(dec(10)),
            OverallPerformance::Fair
        );
        assert_eq!(
            classify_overall_performance(dec(0)),
            OverallPerformance::Poor
        );
        assert_eq!(
            classify_overall_performance(dec(-20)),
            OverallPerformance::Poor
        );
    }
}

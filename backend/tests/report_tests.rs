//! Report engine tests
//!
//! Covers the profitability computation persisted as report snapshots:
//! margins, performance tiers, category rollups, and the executive summary.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{
    build_report, classify_overall_performance, classify_performance, MedicineSnapshot,
    OverallPerformance, PerformanceTier, ProfitStatus, SoldLine,
};
use shared::validation::validate_period;
use uuid::Uuid;

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

// ============================================================================
// Unit Tests
// ============================================================================

/// 4 units sold at 5 with 6 left in stock at buying price 2:
/// buying cost 12, profit 8, margin 40%, performance "good"
#[test]
fn test_scenario_profit_margin() {
    let m = med("Medicine X", 6, 2, 5);
    let sold = vec![SoldLine {
        medicine_id: m.id,
        sold_qty: 4,
        sold_revenue: dec(20),
    }];

    let report = build_report(&[m], &sold, false);
    let row = &report.by_medicine[0];

    assert_eq!(row.sold_qty, 4);
    assert_eq!(row.sold_revenue, dec(20));
    assert_eq!(row.total_buying_cost, dec(12));
    assert_eq!(row.profit, dec(8));
    assert_eq!(row.profit_margin, dec(40));
    assert_eq!(row.performance, PerformanceTier::Good);
    assert_eq!(row.status, ProfitStatus::Profit);

    assert_eq!(report.totals.total_sold_qty, 4);
    assert_eq!(report.totals.total_revenue, dec(20));
    assert_eq!(report.totals.total_buying_cost, dec(12));
    assert_eq!(report.totals.gross_profit, dec(8));
    assert_eq!(report.totals.gross_margin, dec(40));
}

/// A period with no sales and include_zero_sales=true yields a row per
/// medicine with zero sold quantity and profit equal to minus buying cost
#[test]
fn test_zero_sales_round_trip() {
    let meds = vec![
        med("Amoxicillin", 10, 2, 5),
        med("Ibuprofen", 3, 4, 9),
        med("Paracetamol", 0, 1, 2),
    ];

    let report = build_report(&meds, &[], true);

    assert_eq!(report.totals.total_sold_qty, 0);
    assert_eq!(report.totals.total_revenue, dec(0));
    assert_eq!(report.by_medicine.len(), 3);
    for row in &report.by_medicine {
        assert_eq!(row.sold_qty, 0);
        assert_eq!(row.sold_revenue, dec(0));
        assert_eq!(row.profit, -row.total_buying_cost);
        assert_eq!(row.profit_margin, dec(0));
    }
    // Stockless medicine breaks even; the others are losses
    assert_eq!(report.totals.loss_medicines, 2);
    assert_eq!(report.totals.break_even_medicines, 1);
}

/// Without include_zero_sales, idle medicines are left out entirely
#[test]
fn test_idle_medicines_excluded_by_default() {
    let active = med("Active", 5, 1, 3);
    let idle = med("Idle", 5, 1, 3);
    let sold = vec![SoldLine {
        medicine_id: active.id,
        sold_qty: 2,
        sold_revenue: dec(6),
    }];

    let report = build_report(&[active, idle], &sold, false);

    assert_eq!(report.by_medicine.len(), 1);
    assert_eq!(report.totals.total_medicines_analyzed, 1);
    assert_eq!(report.by_medicine[0].name, "Active");
}

/// Category totals are sums of their rows with the margin recomputed
#[test]
fn test_category_rollup() {
    let antibiotics = Uuid::new_v4();
    let analgesics = Uuid::new_v4();

    let mut a = med("Amoxicillin", 4, 2, 5);
    a.category_id = Some(antibiotics);
    a.category_name = Some("Antibiotics".to_string());

    let mut b = med("Azithromycin", 2, 3, 8);
    b.category_id = Some(antibiotics);
    b.category_name = Some("Antibiotics".to_string());

    let mut c = med("Ibuprofen", 1, 1, 2);
    c.category_id = Some(analgesics);
    c.category_name = Some("Analgesics".to_string());

    let sold = vec![
        SoldLine {
            medicine_id: a.id,
            sold_qty: 2,
            sold_revenue: dec(10),
        },
        SoldLine {
            medicine_id: b.id,
            sold_qty: 1,
            sold_revenue: dec(8),
        },
        SoldLine {
            medicine_id: c.id,
            sold_qty: 3,
            sold_revenue: dec(6),
        },
    ];

    let report = build_report(&[a, b, c], &sold, false);

    assert_eq!(report.by_category.len(), 2);
    let antibiotics_row = report
        .by_category
        .iter()
        .find(|r| r.name == "Antibiotics")
        .unwrap();

    // cost: 4*2 + 2*3 = 14; revenue 18; profit 4
    assert_eq!(antibiotics_row.sold_qty, 3);
    assert_eq!(antibiotics_row.sold_revenue, dec(18));
    assert_eq!(antibiotics_row.total_medicine_cost, dec(14));
    assert_eq!(antibiotics_row.gross_profit, dec(4));
    assert_eq!(antibiotics_row.status, ProfitStatus::Profit);

    let category_revenue: Decimal = report.by_category.iter().map(|c| c.sold_revenue).sum();
    assert_eq!(category_revenue, report.totals.total_revenue);
}

/// The executive summary ranks the five biggest winners and losers
#[test]
fn test_executive_summary_rankings() {
    let mut meds = Vec::new();
    let mut sold = Vec::new();
    for i in 1..=6 {
        let m = med(&format!("Winner {}", i), 0, 1, 2);
        sold.push(SoldLine {
            medicine_id: m.id,
            sold_qty: 1,
            sold_revenue: dec(i * 10),
        });
        meds.push(m);
    }
    let loser = med("Loser", 50, 2, 1);
    sold.push(SoldLine {
        medicine_id: loser.id,
        sold_qty: 1,
        sold_revenue: dec(1),
    });
    meds.push(loser);

    let report = build_report(&meds, &sold, false);
    let summary = &report.executive_summary;

    assert_eq!(summary.top_performers.len(), 5);
    assert_eq!(summary.top_performers[0].profit, dec(60));
    assert!(summary
        .top_performers
        .windows(2)
        .all(|w| w[0].profit >= w[1].profit));

    assert_eq!(summary.areas_of_concern.len(), 1);
    assert_eq!(summary.areas_of_concern[0].name, "Loser");
    assert!(!summary.key_insights.is_empty());
}

/// Performance tier thresholds: >50 excellent, >25 good, <0 poor
#[test]
fn test_performance_tiers() {
    assert_eq!(classify_performance(dec(51)), PerformanceTier::Excellent);
    assert_eq!(classify_performance(dec(50)), PerformanceTier::Good);
    assert_eq!(classify_performance(dec(26)), PerformanceTier::Good);
    assert_eq!(classify_performance(dec(25)), PerformanceTier::Average);
    assert_eq!(classify_performance(dec(0)), PerformanceTier::Average);
    assert_eq!(classify_performance(dec(-1)), PerformanceTier::Poor);
}

/// Overall label thresholds from gross margin
#[test]
fn test_overall_performance_label() {
    assert_eq!(
        classify_overall_performance(dec(75)),
        OverallPerformance::Excellent
    );
    assert_eq!(
        classify_overall_performance(dec(40)),
        OverallPerformance::Good
    );
    assert_eq!(
        classify_overall_performance(dec(20)),
        OverallPerformance::Fair
    );
    assert_eq!(
        classify_overall_performance(dec(-5)),
        OverallPerformance::Poor
    );
}

/// Report periods must be ordered
#[test]
fn test_period_validation() {
    let jan = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let feb = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    assert!(validate_period(jan, feb).is_ok());
    assert!(validate_period(feb, jan).is_err());
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Totals always equal the sum of the rows
    #[test]
    fn prop_totals_are_row_sums(
        rows in proptest::collection::vec((1i32..500, 1i64..100, 1i64..100, 0i64..200), 1..12)
    ) {
        let mut meds = Vec::new();
        let mut sold = Vec::new();
        for (i, (stock, buy, sell, qty)) in rows.iter().enumerate() {
            let m = med(&format!("M{}", i), *stock, *buy, *sell);
            if *qty > 0 {
                sold.push(SoldLine {
                    medicine_id: m.id,
                    sold_qty: *qty,
                    sold_revenue: dec(*qty) * dec(*sell),
                });
            }
            meds.push(m);
        }

        let report = build_report(&meds, &sold, true);

        let row_revenue: Decimal = report.by_medicine.iter().map(|r| r.sold_revenue).sum();
        let row_cost: Decimal = report.by_medicine.iter().map(|r| r.total_buying_cost).sum();
        let row_qty: i64 = report.by_medicine.iter().map(|r| r.sold_qty).sum();

        prop_assert_eq!(report.totals.total_revenue, row_revenue);
        prop_assert_eq!(report.totals.total_buying_cost, row_cost);
        prop_assert_eq!(report.totals.total_sold_qty, row_qty);
        prop_assert_eq!(report.totals.gross_profit, row_revenue - row_cost);

        let status_count = report.totals.profitable_medicines
            + report.totals.loss_medicines
            + report.totals.break_even_medicines;
        prop_assert_eq!(status_count, report.totals.total_medicines_analyzed);
    }

    /// Every row's profit matches revenue minus current-stock buying cost
    #[test]
    fn prop_row_profit_formula(stock in 0i32..1000, buy in 0i64..100, sell in 1i64..100, qty in 0i64..500) {
        let m = med("M", stock, buy, sell);
        let sold = vec![SoldLine {
            medicine_id: m.id,
            sold_qty: qty,
            sold_revenue: dec(qty) * dec(sell),
        }];

        let report = build_report(&[m], &sold, true);
        let row = &report.by_medicine[0];

        prop_assert_eq!(row.profit, row.sold_revenue - row.total_buying_cost);
        if row.sold_revenue > Decimal::ZERO {
            // margin stays within [-inf, 100] and equals profit/revenue
            prop_assert!(row.profit_margin <= dec(100));
        } else {
            prop_assert_eq!(row.profit_margin, dec(0));
        }
    }
}

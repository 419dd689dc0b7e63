//! Sale settlement planning
//!
//! Recording a sale fans out into up to three writes: the sale itself, a
//! payment for whatever was paid up front, and a debt for whatever remains.
//! The decision of which records to create and with which amounts is a pure
//! function of the totals, kept here so the backend transaction only has to
//! execute the plan.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::debt::{derive_debt_status, remaining_balance, DebtStatus};

/// Days until a credit sale's debt falls due
pub const DEBT_DUE_DAYS: i64 = 30;

/// How a sale was transacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    #[default]
    Cash,
    Credit,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::Cash => "cash",
            SaleType::Credit => "credit",
        }
    }
}

/// Debt record to be created for an unpaid balance
#[derive(Debug, Clone, PartialEq)]
pub struct DebtPlan {
    pub total_owed: Decimal,
    pub amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub due_date: DateTime<Utc>,
    pub status: DebtStatus,
}

/// Records a sale implies beyond the sale row itself
#[derive(Debug, Clone, PartialEq)]
pub struct SaleSettlement {
    pub balance: Decimal,
    /// Up-front payment to append to the payment ledger, if any
    pub payment_amount: Option<Decimal>,
    /// Debt to open for the unpaid remainder, if any
    pub debt: Option<DebtPlan>,
}

/// Total of a sale's line items
pub fn sale_total(line_subtotals: &[Decimal]) -> Decimal {
    line_subtotals.iter().copied().sum()
}

/// Plan the payment and debt records for a sale.
///
/// Assumes `amount_paid` has already been validated to lie in
/// `[0, total_amount]`.
pub fn settle_sale(
    total_amount: Decimal,
    amount_paid: Decimal,
    sale_date: DateTime<Utc>,
) -> SaleSettlement {
    let balance = total_amount - amount_paid;

    let payment_amount = if amount_paid > Decimal::ZERO {
        Some(amount_paid)
    } else {
        None
    };

    let debt = if balance > Decimal::ZERO {
        let due_date = sale_date + Duration::days(DEBT_DUE_DAYS);
        Some(DebtPlan {
            total_owed: total_amount,
            amount_paid,
            remaining_balance: remaining_balance(total_amount, amount_paid),
            due_date,
            status: derive_debt_status(total_amount, amount_paid, due_date, sale_date),
        })
    } else {
        None
    };

    SaleSettlement {
        balance,
        payment_amount,
        debt,
    }
}

//! Debt reconciliation tests
//!
//! Covers the derived-status rule and the payment application math shared by
//! the pay-debt and add-payment flows.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{derive_debt_status, remaining_balance, settle_sale, DebtStatus};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Paying off the debt from a 20-total / 5-paid sale clears it exactly
#[test]
fn test_payment_clears_debt() {
    let sale_date = Utc::now();
    let settlement = settle_sale(dec(20), dec(5), sale_date);
    let debt = settlement.debt.expect("credit sale opens a debt");

    // A further payment of 15 arrives
    let amount_paid = debt.amount_paid + dec(15);
    let remaining = remaining_balance(debt.total_owed, amount_paid);
    let status = derive_debt_status(debt.total_owed, amount_paid, debt.due_date, sale_date);

    assert_eq!(remaining, dec(0));
    assert_eq!(status, DebtStatus::Cleared);
}

/// A partial payment leaves the debt partial with the right balance
#[test]
fn test_partial_payment_keeps_debt_partial() {
    let now = Utc::now();
    let due = now + Duration::days(30);

    let amount_paid = dec(5) + dec(7);
    let remaining = remaining_balance(dec(20), amount_paid);
    let status = derive_debt_status(dec(20), amount_paid, due, now);

    assert_eq!(remaining, dec(8));
    assert_eq!(status, DebtStatus::Partial);
}

/// Overpayments clamp the balance at zero instead of rejecting
#[test]
fn test_overpayment_is_clamped() {
    let now = Utc::now();
    let due = now + Duration::days(30);

    let remaining = remaining_balance(dec(20), dec(35));
    let status = derive_debt_status(dec(20), dec(35), due, now);

    assert_eq!(remaining, dec(0));
    assert_eq!(status, DebtStatus::Cleared);
}

/// Re-deriving a settled debt changes nothing
#[test]
fn test_settled_debt_derivation_is_idempotent() {
    let now = Utc::now();
    let due = now + Duration::days(30);

    let first_remaining = remaining_balance(dec(20), dec(20));
    let first_status = derive_debt_status(dec(20), dec(20), due, now);

    // Same values applied again, later
    let second_remaining = remaining_balance(dec(20), dec(20));
    let second_status = derive_debt_status(dec(20), dec(20), due, now + Duration::days(90));

    assert_eq!(first_remaining, second_remaining);
    assert_eq!(first_status, second_status);
    assert_eq!(first_status, DebtStatus::Cleared);
}

/// Past-due debts are overdue unless cleared
#[test]
fn test_overdue_derivation() {
    let now = Utc::now();
    let past_due = now - Duration::days(3);

    assert_eq!(
        derive_debt_status(dec(20), dec(0), past_due, now),
        DebtStatus::Overdue
    );
    assert_eq!(
        derive_debt_status(dec(20), dec(5), past_due, now),
        DebtStatus::Overdue
    );
    assert_eq!(
        derive_debt_status(dec(20), dec(20), past_due, now),
        DebtStatus::Cleared
    );
}

/// Administrative term changes recompute balance and status from the new
/// values
#[test]
fn test_term_update_recomputes_state() {
    let now = Utc::now();
    let due = now + Duration::days(30);

    // Debt of 20 with 5 paid; the total is corrected down to 5
    let new_total = dec(5);
    let remaining = remaining_balance(new_total, dec(5));
    let status = derive_debt_status(new_total, dec(5), due, now);

    assert_eq!(remaining, dec(0));
    assert_eq!(status, DebtStatus::Cleared);

    // Corrected up instead
    let new_total = dec(50);
    let remaining = remaining_balance(new_total, dec(5));
    let status = derive_debt_status(new_total, dec(5), due, now);

    assert_eq!(remaining, dec(45));
    assert_eq!(status, DebtStatus::Partial);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// remaining_balance == max(0, total - paid) for all inputs
    #[test]
    fn prop_remaining_balance_formula(total in 0i64..1_000_000, paid in 0i64..2_000_000) {
        let expected = (dec(total) - dec(paid)).max(Decimal::ZERO);
        prop_assert_eq!(remaining_balance(dec(total), dec(paid)), expected);
    }

    /// The derived status always matches the §3-style rule
    #[test]
    fn prop_status_matches_rule(
        total in 1i64..1_000_000,
        paid in 0i64..2_000_000,
        days_until_due in -60i64..60,
    ) {
        let now = Utc::now();
        let due = now + Duration::days(days_until_due);
        let status = derive_debt_status(dec(total), dec(paid), due, now);

        let expected = if paid >= total {
            DebtStatus::Cleared
        } else if due < now {
            DebtStatus::Overdue
        } else if paid > 0 {
            DebtStatus::Partial
        } else {
            DebtStatus::Pending
        };

        prop_assert_eq!(status, expected);
    }

    /// Applying payments repeatedly is monotone: the balance never rises and
    /// a cleared debt never un-clears
    #[test]
    fn prop_payments_are_monotone(total in 1i64..100_000, payments in proptest::collection::vec(1i64..50_000, 1..8)) {
        let now = Utc::now();
        let due = now + Duration::days(30);

        let total = dec(total);
        let mut paid = Decimal::ZERO;
        let mut last_remaining = total;
        let mut was_cleared = false;

        for p in payments {
            paid += dec(p);
            let remaining = remaining_balance(total, paid);
            let status = derive_debt_status(total, paid, due, now);

            prop_assert!(remaining <= last_remaining);
            if was_cleared {
                prop_assert_eq!(status, DebtStatus::Cleared);
            }
            was_cleared = status == DebtStatus::Cleared;
            last_remaining = remaining;
        }
    }
}

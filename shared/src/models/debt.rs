//! Debt status derivation
//!
//! A debt is the outstanding balance of a single credit sale. Its status is
//! never set directly; it is always derived from the amounts and the due
//! date, so the rule lives here as a pure function that every mutation path
//! (sale creation, debt payment, administrative update) calls explicitly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Repayment state of a debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Pending,
    Partial,
    Cleared,
    Overdue,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "pending",
            DebtStatus::Partial => "partial",
            DebtStatus::Cleared => "cleared",
            DebtStatus::Overdue => "overdue",
        }
    }
}

/// Outstanding balance, floored at zero. Overpayments clear the debt rather
/// than producing a negative balance.
pub fn remaining_balance(total_owed: Decimal, amount_paid: Decimal) -> Decimal {
    (total_owed - amount_paid).max(Decimal::ZERO)
}

/// Derive the status of a debt from its amounts and due date.
///
/// Cleared when nothing remains; otherwise partial once any payment has been
/// made, pending when none has. An unpaid debt past its due date is overdue
/// regardless of partial payments.
pub fn derive_debt_status(
    total_owed: Decimal,
    amount_paid: Decimal,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DebtStatus {
    if remaining_balance(total_owed, amount_paid) <= Decimal::ZERO {
        return DebtStatus::Cleared;
    }
    if due_date < now {
        return DebtStatus::Overdue;
    }
    if amount_paid > Decimal::ZERO {
        DebtStatus::Partial
    } else {
        DebtStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn balance_floors_at_zero() {
        assert_eq!(remaining_balance(dec(100), dec(40)), dec(60));
        assert_eq!(remaining_balance(dec(100), dec(100)), dec(0));
        assert_eq!(remaining_balance(dec(100), dec(150)), dec(0));
    }

    #[test]
    fn derives_all_statuses() {
        let now = Utc::now();
        let due = now + Duration::days(30);

        assert_eq!(
            derive_debt_status(dec(100), dec(0), due, now),
            DebtStatus::Pending
        );
        assert_eq!(
            derive_debt_status(dec(100), dec(40), due, now),
            DebtStatus::Partial
        );
        assert_eq!(
            derive_debt_status(dec(100), dec(100), due, now),
            DebtStatus::Cleared
        );
        assert_eq!(
            derive_debt_status(dec(100), dec(120), due, now),
            DebtStatus::Cleared
        );
    }

    #[test]
    fn overdue_overrides_pending_and_partial_but_not_cleared() {
        let now = Utc::now();
        let past_due = now - Duration::days(1);

        assert_eq!(
            derive_debt_status(dec(100), dec(0), past_due, now),
            DebtStatus::Overdue
        );
        assert_eq!(
            derive_debt_status(dec(100), dec(40), past_due, now),
            DebtStatus::Overdue
        );
        assert_eq!(
            derive_debt_status(dec(100), dec(100), past_due, now),
            DebtStatus::Cleared
        );
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn balance_is_never_negative(total in 0i64..1_000_000, paid in 0i64..2_000_000) {
            let b = remaining_balance(dec(total), dec(paid));
            prop_assert!(b >= Decimal::ZERO);
        }

        #[test]
        fn cleared_exactly_when_fully_paid(total in 1i64..1_000_000, paid in 0i64..2_000_000) {
            let now = Utc::now();
            let status = derive_debt_status(dec(total), dec(paid), now + Duration::days(30), now);
            prop_assert_eq!(status == DebtStatus::Cleared, paid >= total);
        }
    }

    #[test]
    fn derivation_is_idempotent_once_cleared() {
        let now = Utc::now();
        let due = now + Duration::days(30);

        let first = derive_debt_status(dec(100), dec(100), due, now);
        let second = derive_debt_status(dec(100), dec(100), due, now + Duration::days(60));
        assert_eq!(first, DebtStatus::Cleared);
        assert_eq!(second, DebtStatus::Cleared);
        assert_eq!(remaining_balance(dec(100), dec(100)), dec(0));
    }
}

//! Validation helpers shared by the backend services
//!
//! Stateless field checks live here; rules that need current database state
//! (stock levels, record existence) stay in the services.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Validate a sale/purchase line quantity
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Validate a monetary amount that must be strictly positive
pub fn validate_positive_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than 0");
    }
    Ok(())
}

/// Validate a unit price (zero is allowed for giveaways, negative is not)
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate the up-front payment against a sale total
pub fn validate_amount_paid(amount_paid: Decimal, total_amount: Decimal) -> Result<(), &'static str> {
    if amount_paid < Decimal::ZERO {
        return Err("Amount paid cannot be negative");
    }
    if amount_paid > total_amount {
        return Err("Amount paid cannot exceed the sale total");
    }
    Ok(())
}

/// Validate a report period
pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if end < start {
        return Err("End date cannot be before start date");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn rejects_non_positive_quantities() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1).is_ok());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(validate_positive_amount(dec(0)).is_err());
        assert!(validate_positive_amount(dec(-1)).is_err());
        assert!(validate_positive_amount(dec(5)).is_ok());
    }

    #[test]
    fn price_may_be_zero_but_not_negative() {
        assert!(validate_price(dec(0)).is_ok());
        assert!(validate_price(dec(-1)).is_err());
    }

    #[test]
    fn amount_paid_is_bounded_by_total() {
        assert!(validate_amount_paid(dec(0), dec(20)).is_ok());
        assert!(validate_amount_paid(dec(20), dec(20)).is_ok());
        assert!(validate_amount_paid(dec(-1), dec(20)).is_err());
        assert!(validate_amount_paid(dec(21), dec(20)).is_err());
    }

    #[test]
    fn period_end_must_not_precede_start() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert!(validate_period(start, end).is_ok());
        assert!(validate_period(start, start).is_ok());
        assert!(validate_period(end, start).is_err());
    }
}

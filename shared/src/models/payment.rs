//! Payment ledger types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    CustomerPayment,
    SupplierPayment,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::CustomerPayment => "customer_payment",
            PaymentType::SupplierPayment => "supplier_payment",
        }
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Credit,
    Mobile,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Mobile => "mobile",
        }
    }
}

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Generate a unique payment reference (e.g. "PAY-9F2A4C1D7B3E")
pub fn generate_payment_reference() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("PAY-{}", id[..12].to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_expected_shape() {
        let r = generate_payment_reference();
        assert!(r.starts_with("PAY-"));
        assert_eq!(r.len(), 16);
        assert!(r[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn references_are_unique() {
        let a = generate_payment_reference();
        let b = generate_payment_reference();
        assert_ne!(a, b);
    }
}

//! Stock ledger types
//!
//! The stock ledger is an append-only history of every quantity change
//! applied to a medicine. Summing `quantity_change` for a medicine
//! reconstructs its stock level at any point in time.

use serde::{Deserialize, Serialize};

/// Kind of stock movement recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockChangeType {
    Purchase,
    UpdatePurchase,
    Sale,
    Adjustment,
}

impl StockChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockChangeType::Purchase => "purchase",
            StockChangeType::UpdatePurchase => "update_purchase",
            StockChangeType::Sale => "sale",
            StockChangeType::Adjustment => "adjustment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_types_are_snake_case() {
        for t in [
            StockChangeType::Purchase,
            StockChangeType::UpdatePurchase,
            StockChangeType::Sale,
            StockChangeType::Adjustment,
        ] {
            assert!(t
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&StockChangeType::UpdatePurchase).unwrap();
        assert_eq!(json, "\"update_purchase\"");
    }
}

//! Medicine stock classification

use serde::{Deserialize, Serialize};

/// Medicines at or below this quantity are flagged for restocking
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Stock health of a medicine, derived from its current quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
}

/// Classify a stock quantity against the low-stock threshold
pub fn classify_stock_level(quantity_in_stock: i32) -> StockLevel {
    if quantity_in_stock <= 0 {
        StockLevel::OutOfStock
    } else if quantity_in_stock < LOW_STOCK_THRESHOLD {
        StockLevel::LowStock
    } else {
        StockLevel::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_stock_levels() {
        assert_eq!(classify_stock_level(0), StockLevel::OutOfStock);
        assert_eq!(classify_stock_level(9), StockLevel::LowStock);
        assert_eq!(classify_stock_level(10), StockLevel::InStock);
        assert_eq!(classify_stock_level(500), StockLevel::InStock);
    }
}

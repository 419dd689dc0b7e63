//! Stock ledger tests
//!
//! The reconciler applies a delta to the stock snapshot and appends the same
//! delta to the ledger in one transaction, refusing any change that would
//! take the quantity below zero. These tests model that contract: replaying
//! the accepted ledger entries over the seed always reproduces the snapshot,
//! and the snapshot can never go negative.

use proptest::prelude::*;
use shared::models::{classify_stock_level, StockChangeType, StockLevel, LOW_STOCK_THRESHOLD};

/// Mirror of the reconciler's conditional update: the delta is accepted only
/// if the resulting quantity stays non-negative, and accepted deltas are
/// appended to the ledger.
fn apply_change(quantity: i32, delta: i32, ledger: &mut Vec<i32>) -> i32 {
    if delta == 0 {
        return quantity;
    }
    let next = quantity + delta;
    if next < 0 {
        return quantity;
    }
    ledger.push(delta);
    next
}

// ============================================================================
// Unit Tests
// ============================================================================

/// A sale debit is refused rather than driving stock negative
#[test]
fn test_oversell_is_refused() {
    let mut ledger = Vec::new();
    let mut quantity = apply_change(0, 10, &mut ledger);
    assert_eq!(quantity, 10);

    // Selling 11 against 10 in stock must change nothing
    quantity = apply_change(quantity, -11, &mut ledger);
    assert_eq!(quantity, 10);
    assert_eq!(ledger, vec![10]);

    // Selling 10 is fine
    quantity = apply_change(quantity, -10, &mut ledger);
    assert_eq!(quantity, 0);
    assert_eq!(ledger, vec![10, -10]);
}

/// The ledger sum plus the seed reconstructs the snapshot
#[test]
fn test_ledger_reconstructs_snapshot() {
    let seed = 25;
    let mut ledger = Vec::new();
    let mut quantity = seed;

    for delta in [200, -100, -50, 30, -4] {
        quantity = apply_change(quantity, delta, &mut ledger);
    }

    let replayed: i32 = seed + ledger.iter().sum::<i32>();
    assert_eq!(replayed, quantity);
    assert_eq!(quantity, 101);
}

/// Zero deltas never enter the ledger
#[test]
fn test_zero_delta_is_rejected() {
    let mut ledger = Vec::new();
    let quantity = apply_change(5, 0, &mut ledger);
    assert_eq!(quantity, 5);
    assert!(ledger.is_empty());
}

#[test]
fn test_change_type_labels() {
    assert_eq!(StockChangeType::Purchase.as_str(), "purchase");
    assert_eq!(StockChangeType::UpdatePurchase.as_str(), "update_purchase");
    assert_eq!(StockChangeType::Sale.as_str(), "sale");
    assert_eq!(StockChangeType::Adjustment.as_str(), "adjustment");
}

#[test]
fn test_stock_level_classification() {
    assert_eq!(classify_stock_level(0), StockLevel::OutOfStock);
    assert_eq!(
        classify_stock_level(LOW_STOCK_THRESHOLD - 1),
        StockLevel::LowStock
    );
    assert_eq!(
        classify_stock_level(LOW_STOCK_THRESHOLD),
        StockLevel::InStock
    );
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Stock never goes negative, whatever sequence of deltas arrives
    #[test]
    fn prop_stock_never_negative(
        seed in 0i32..1000,
        deltas in proptest::collection::vec(-500i32..500, 0..50),
    ) {
        let mut ledger = Vec::new();
        let mut quantity = seed;
        for delta in deltas {
            quantity = apply_change(quantity, delta, &mut ledger);
            prop_assert!(quantity >= 0);
        }
    }

    /// Replaying the ledger over the seed always reproduces the snapshot
    #[test]
    fn prop_ledger_and_snapshot_agree(
        seed in 0i32..1000,
        deltas in proptest::collection::vec(-500i32..500, 0..50),
    ) {
        let mut ledger = Vec::new();
        let mut quantity = seed;
        for delta in deltas {
            quantity = apply_change(quantity, delta, &mut ledger);
        }
        prop_assert_eq!(seed + ledger.iter().sum::<i32>(), quantity);
    }
}

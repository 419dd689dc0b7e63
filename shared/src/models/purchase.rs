//! Purchase types

use serde::{Deserialize, Serialize};

/// Settlement state of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    #[default]
    Paid,
    Pending,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Paid => "paid",
            PurchaseStatus::Pending => "pending",
        }
    }
}

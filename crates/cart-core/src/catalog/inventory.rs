//! Stock snapshots.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Available stock for a product, as reported by the stock lookup.
///
/// Fetched fresh for every mutation that needs it; never cached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockRecord {
    /// Product this record describes.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units available.
    pub amount: i64,
}

impl StockRecord {
    /// Create a stock record.
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }

    /// Units available, clamped at zero.
    pub fn available(&self) -> i64 {
        self.amount.max(0)
    }

    /// Check if a specific quantity can be held in the cart.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.available()
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.available() == 0
    }
}

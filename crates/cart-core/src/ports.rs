//! Collaborators the cart depends on.
//!
//! The cart never talks to a network or a UI directly; hosts plug these in.
//! Persistence goes through [`cart_cache::KvStore`].

use crate::catalog::{Product, StockRecord};
use crate::error::LookupError;
use crate::ids::ProductId;
use async_trait::async_trait;

/// Source of live stock counts.
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Fetch the current stock record for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError>;
}

/// Source of product descriptions.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch the descriptive data for a product.
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError>;
}

/// Fire-and-forget channel for user-facing messages.
pub trait NotificationSink: Send + Sync {
    /// Show `message` to the user.
    fn notify(&self, message: &str);
}

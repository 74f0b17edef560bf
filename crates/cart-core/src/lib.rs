//! Shopping cart state reconciled against remote stock.
//!
//! This crate holds the cart a client application shows its user:
//!
//! - **Cart**: ordered line items, one per product, amounts always positive
//! - **CartStore**: add / remove / set-quantity, each checked against a live
//!   stock lookup and persisted after every successful change
//! - **Ports**: the stock lookup, product lookup and notification sink a
//!   host plugs in; persistence goes through [`cart_cache`]
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_core::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(InMemoryCatalog::new().with_product(1, "Runner", 5));
//! let collaborators = Collaborators::new(
//!     catalog,
//!     Cache::memory(),
//!     Arc::new(TracingNotifier),
//! );
//! let store = CartStore::open(collaborators, CartConfig::default())?;
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.update_product_amount(ProductId::new(1), 3).await?;
//! assert_eq!(store.current_cart().item_count(), 3);
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod ids;
pub mod memory;
pub mod notify;
pub mod ports;

pub mod cart;
pub mod catalog;
pub mod store;

pub use config::{CartConfig, Messages};
pub use error::{CartError, CartResult, LookupError};
pub use ids::ProductId;
pub use store::{CartStore, Collaborators};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{CartConfig, Messages};
    pub use crate::error::{CartError, CartResult, LookupError};
    pub use crate::ids::ProductId;

    pub use crate::cart::{Cart, LineItem};
    pub use crate::catalog::{Product, StockRecord};

    pub use crate::memory::{CatalogFixture, InMemoryCatalog, RecordingNotifier};
    pub use crate::notify::{NotificationPolicy, Operation, TracingNotifier};
    pub use crate::ports::{NotificationSink, ProductLookup, StockLookup};
    pub use crate::store::{CartStore, Collaborators};

    pub use cart_cache::Cache;
}

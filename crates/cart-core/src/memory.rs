//! In-memory collaborators.
//!
//! Useful for tests, demos, and offline fixtures. The fixture format is the
//! `db.json` layout of a json-server style product API:
//! `{ "products": [...], "stock": [...] }`.

use crate::catalog::{Product, StockRecord};
use crate::error::LookupError;
use crate::ids::ProductId;
use crate::ports::{NotificationSink, ProductLookup, StockLookup};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

/// Catalog contents in fixture form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<StockRecord>,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, i64>,
}

/// Product and stock lookups served from memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    offline: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from fixture data.
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        let catalog = Self::new();
        for product in fixture.products {
            catalog.insert_product(product);
        }
        for record in fixture.stock {
            catalog.set_stock(record.product_id, record.amount);
        }
        catalog
    }

    /// Add or replace a product.
    pub fn insert_product(&self, product: Product) {
        self.write().products.insert(product.id, product);
    }

    /// Set the stock count for a product.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        self.write().stock.insert(product_id, amount);
    }

    /// Convenience: a product with a title and a stock count.
    pub fn with_product(self, product_id: u64, title: &str, stock: i64) -> Self {
        let id = ProductId::new(product_id);
        self.insert_product(Product::new(id).with_attribute("title", title));
        self.set_stock(id, stock);
        self
    }

    /// Make every lookup fail with a network error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), LookupError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LookupError::Network("catalog offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StockLookup for InMemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        self.check_online()?;
        self.read()
            .stock
            .get(&product_id)
            .map(|amount| StockRecord::new(product_id, *amount))
            .ok_or(LookupError::NotFound(product_id))
    }
}

#[async_trait]
impl ProductLookup for InMemoryCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError> {
        self.check_online()?;
        self.read()
            .products
            .get(&product_id)
            .cloned()
            .ok_or(LookupError::NotFound(product_id))
    }
}

/// Sink that keeps every message it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drain the received messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

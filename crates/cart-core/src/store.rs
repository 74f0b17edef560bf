//! The cart store: owned cart state plus its three mutations.

use crate::cart::{Cart, LineItem};
use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::gate::ProductGate;
use crate::ids::ProductId;
use crate::notify::{NotificationPolicy, Operation};
use crate::ports::{NotificationSink, ProductLookup, StockLookup};
use cart_cache::Cache;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// External services a [`CartStore`] works against.
#[derive(Clone)]
pub struct Collaborators {
    /// Live stock counts.
    pub stock: Arc<dyn StockLookup>,
    /// Product descriptions.
    pub products: Arc<dyn ProductLookup>,
    /// Where the cart is persisted.
    pub storage: Cache,
    /// Where user-facing failures go.
    pub notifier: Arc<dyn NotificationSink>,
}

impl Collaborators {
    /// Use one catalog service for both stock and product lookups.
    pub fn new<C>(catalog: Arc<C>, storage: Cache, notifier: Arc<dyn NotificationSink>) -> Self
    where
        C: StockLookup + ProductLookup + 'static,
    {
        Self {
            stock: catalog.clone(),
            products: catalog,
            storage,
            notifier,
        }
    }
}

/// Shopping cart state reconciled against remote stock.
///
/// Each operation either applies its whole mutation and persists the new
/// cart, or leaves the cart untouched. Failures come back as a
/// [`CartError`] and, unless the notification policy keeps them silent,
/// are also reported through the [`NotificationSink`]. An operation
/// performs at most one persistence write or one notification, never both.
///
/// Operations on the same product are serialized by a [`ProductGate`], so
/// two overlapping `add_product(1)` calls always add two units.
pub struct CartStore {
    cart: Mutex<Cart>,
    stock: Arc<dyn StockLookup>,
    products: Arc<dyn ProductLookup>,
    storage: Cache,
    notifier: Arc<dyn NotificationSink>,
    policy: NotificationPolicy,
    storage_key: String,
    gate: ProductGate,
}

impl CartStore {
    /// Create a store, hydrating the cart from storage.
    ///
    /// A missing entry yields an empty cart, as does an entry that cannot be
    /// decoded. Persisted line items that break the cart invariants are
    /// dropped. Fails only when the storage backend itself cannot be read.
    pub fn open(collaborators: Collaborators, config: CartConfig) -> CartResult<Self> {
        let cart = hydrate(&collaborators.storage, &config.storage_key)?;
        info!(
            key = %config.storage_key,
            items = cart.unique_item_count(),
            "cart hydrated"
        );

        Ok(Self {
            cart: Mutex::new(cart),
            stock: collaborators.stock,
            products: collaborators.products,
            storage: collaborators.storage,
            notifier: collaborators.notifier,
            policy: NotificationPolicy::new(config.messages),
            storage_key: config.storage_key,
            gate: ProductGate::new(),
        })
    }

    /// Snapshot of the current cart.
    pub fn current_cart(&self) -> Cart {
        self.lock().clone()
    }

    /// The policy deciding which failures this store notifies about.
    pub fn policy(&self) -> &NotificationPolicy {
        &self.policy
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is looked up and appended with amount 1.
    /// A product already in the cart is incremented if stock allows it.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let result = self.try_add(product_id).await;
        self.finish(Operation::Add, product_id, result)
    }

    /// Remove a product's line item.
    ///
    /// Removing a product that is not in the cart is reported as a failure.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let result = self.try_remove(product_id).await;
        self.finish(Operation::Remove, product_id, result)
    }

    /// Set a product's amount exactly.
    ///
    /// Non-positive amounts and products absent from the cart are silent
    /// no-ops; use [`remove_product`](Self::remove_product) to drop an item.
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<Cart> {
        let result = self.try_update(product_id, amount).await;
        self.finish(Operation::UpdateAmount, product_id, result)
    }

    async fn try_add(&self, product_id: ProductId) -> CartResult<Cart> {
        let _slot = self.gate.acquire(product_id).await;

        let current = self.lock().get_item(product_id).map(|item| item.amount);
        match current {
            None => {
                debug!(%product_id, "fetching product for new line item");
                let product = self.products.product(product_id).await?;
                let mut item = LineItem::from_product(product);
                // The cart is keyed by the id that was asked for.
                item.product_id = product_id;
                self.commit(|cart| cart.add_item(item))
            }
            Some(amount) => {
                debug!(%product_id, amount, "checking stock before increment");
                let stock = self.stock.stock(product_id).await?;
                let requested = amount.saturating_add(1);
                if !stock.can_fulfill(requested) {
                    return Err(CartError::StockExceeded {
                        product_id,
                        requested,
                        available: stock.available(),
                    });
                }
                self.commit(|cart| cart.set_amount(product_id, requested))
            }
        }
    }

    async fn try_remove(&self, product_id: ProductId) -> CartResult<Cart> {
        let _slot = self.gate.acquire(product_id).await;
        self.commit(|cart| cart.remove_item(product_id).map(drop))
    }

    async fn try_update(&self, product_id: ProductId, amount: i64) -> CartResult<Cart> {
        if amount <= 0 {
            return Err(CartError::InvalidQuantity(amount));
        }

        let _slot = self.gate.acquire(product_id).await;

        debug!(%product_id, amount, "checking stock before quantity change");
        let stock = self.stock.stock(product_id).await?;
        if !stock.can_fulfill(amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.available(),
            });
        }

        self.commit(|cart| cart.set_amount(product_id, amount))
    }

    /// Apply a validated mutation to the live cart and persist the result.
    ///
    /// The write happens under the cart lock so stored snapshots land in the
    /// same order as in-memory updates.
    fn commit<F>(&self, mutate: F) -> CartResult<Cart>
    where
        F: FnOnce(&mut Cart) -> CartResult<()>,
    {
        let mut cart = self.lock();
        mutate(&mut cart)?;
        let snapshot = cart.clone();

        if let Err(e) = self.storage.set(&self.storage_key, &snapshot) {
            error!(key = %self.storage_key, error = %e, "failed to persist cart");
        }

        Ok(snapshot)
    }

    fn finish(
        &self,
        op: Operation,
        product_id: ProductId,
        result: CartResult<Cart>,
    ) -> CartResult<Cart> {
        match &result {
            Ok(cart) => {
                let amount = cart.get_item(product_id).map(|item| item.amount);
                info!(op = op.as_str(), %product_id, amount, "cart updated");
            }
            Err(err) => match self.policy.message_for(op, err) {
                Some(message) => {
                    warn!(op = op.as_str(), %product_id, error = %err, "cart operation failed");
                    self.notifier.notify(message);
                }
                None => {
                    debug!(op = op.as_str(), %product_id, error = %err, "cart operation ignored");
                }
            },
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("cart", &*self.lock())
            .finish_non_exhaustive()
    }
}

fn hydrate(storage: &Cache, key: &str) -> CartResult<Cart> {
    match storage.get::<Vec<LineItem>>(key) {
        Ok(None) => Ok(Cart::new()),
        Ok(Some(items)) => {
            let (cart, dropped) = Cart::from_persisted(items);
            if !dropped.is_empty() {
                warn!(key, dropped = dropped.len(), "dropped invalid persisted line items");
            }
            Ok(cart)
        }
        Err(e) if e.is_corrupt() => {
            warn!(key, error = %e, "persisted cart unreadable, starting empty");
            Ok(Cart::new())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::memory::{InMemoryCatalog, RecordingNotifier};
    use cart_cache::{CacheError, KvStore, MemoryStore};

    struct Harness {
        store: CartStore,
        catalog: Arc<InMemoryCatalog>,
        notifier: Arc<RecordingNotifier>,
        storage: Cache,
    }

    fn harness(catalog: InMemoryCatalog) -> Harness {
        let catalog = Arc::new(catalog);
        let notifier = Arc::new(RecordingNotifier::new());
        let storage = Cache::memory();
        let collaborators = Collaborators::new(catalog.clone(), storage.clone(), notifier.clone());
        let store = CartStore::open(collaborators, CartConfig::default()).unwrap();
        Harness {
            store,
            catalog,
            notifier,
            storage,
        }
    }

    fn persisted(h: &Harness) -> Option<Cart> {
        h.storage.get("cart:default").unwrap()
    }

    const ONE: ProductId = ProductId::new(1);
    const TWO: ProductId = ProductId::new(2);

    #[tokio::test]
    async fn test_add_new_product() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));

        let cart = h.store.add_product(ONE).await.unwrap();
        let item = cart.get_item(ONE).unwrap();
        assert_eq!(item.amount, 1);
        assert_eq!(item.title(), Some("Runner"));
        assert_eq!(persisted(&h), Some(cart));
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_add_increments_within_stock() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 2));

        h.store.add_product(ONE).await.unwrap();
        let cart = h.store.add_product(ONE).await.unwrap();
        assert_eq!(cart.get_item(ONE).unwrap().amount, 2);
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_notifies_and_keeps_cart() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 1));
        h.store.add_product(ONE).await.unwrap();
        let before = persisted(&h);

        let err = h.store.add_product(ONE).await.unwrap_err();
        assert_eq!(
            err,
            CartError::StockExceeded {
                product_id: ONE,
                requested: 2,
                available: 1
            }
        );
        assert_eq!(h.store.current_cart().get_item(ONE).unwrap().amount, 1);
        assert_eq!(persisted(&h), before);
        assert_eq!(h.notifier.messages(), vec!["Requested quantity is out of stock"]);
    }

    #[tokio::test]
    async fn test_add_unknown_product_notifies() {
        let h = harness(InMemoryCatalog::new());

        let err = h.store.add_product(ONE).await.unwrap_err();
        assert_eq!(err, CartError::NotFound(ONE));
        assert!(h.store.current_cart().is_empty());
        assert_eq!(persisted(&h), None);
        assert_eq!(h.notifier.messages(), vec!["Could not add product"]);
    }

    #[tokio::test]
    async fn test_add_existing_with_stock_lookup_failure() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));
        h.store.add_product(ONE).await.unwrap();
        h.catalog.set_offline(true);

        let err = h.store.add_product(ONE).await.unwrap_err();
        assert!(matches!(err, CartError::Network(_)));
        assert_eq!(h.store.current_cart().get_item(ONE).unwrap().amount, 1);
        assert_eq!(h.notifier.messages(), vec!["Could not add product"]);
    }

    #[tokio::test]
    async fn test_remove_product() {
        let h = harness(
            InMemoryCatalog::new()
                .with_product(1, "Runner", 5)
                .with_product(2, "Boot", 5),
        );
        h.store.add_product(ONE).await.unwrap();
        h.store.add_product(TWO).await.unwrap();

        let cart = h.store.remove_product(ONE).await.unwrap();
        assert_eq!(cart.items(), h.store.current_cart().items());
        assert_eq!(cart.unique_item_count(), 1);
        assert!(cart.get_item(TWO).is_some());
        assert_eq!(persisted(&h), Some(cart));
    }

    #[tokio::test]
    async fn test_remove_missing_notifies() {
        let h = harness(InMemoryCatalog::new());

        let err = h.store.remove_product(ONE).await.unwrap_err();
        assert_eq!(err, CartError::ItemNotInCart(ONE));
        assert_eq!(h.notifier.messages(), vec!["Could not remove product"]);
        assert_eq!(persisted(&h), None);
    }

    #[tokio::test]
    async fn test_update_non_positive_is_silent() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));
        h.store.add_product(ONE).await.unwrap();
        h.catalog.set_offline(true);

        for amount in [0, -5] {
            let err = h.store.update_product_amount(ONE, amount).await.unwrap_err();
            assert_eq!(err, CartError::InvalidQuantity(amount));
        }
        assert_eq!(h.store.current_cart().get_item(ONE).unwrap().amount, 1);
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));
        h.store.add_product(ONE).await.unwrap();

        let cart = h.store.update_product_amount(ONE, 5).await.unwrap();
        assert_eq!(cart.get_item(ONE).unwrap().amount, 5);
        let cart = h.store.update_product_amount(ONE, 3).await.unwrap();
        assert_eq!(cart.get_item(ONE).unwrap().amount, 3);
        assert_eq!(persisted(&h), Some(cart));
    }

    #[tokio::test]
    async fn test_update_beyond_stock_notifies() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));
        h.store.add_product(ONE).await.unwrap();

        let err = h.store.update_product_amount(ONE, 6).await.unwrap_err();
        assert!(matches!(err, CartError::StockExceeded { requested: 6, available: 5, .. }));
        assert_eq!(h.store.current_cart().get_item(ONE).unwrap().amount, 1);
        assert_eq!(h.notifier.messages(), vec!["Requested quantity is out of stock"]);
    }

    #[tokio::test]
    async fn test_update_absent_item_is_silent() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));

        let err = h.store.update_product_amount(ONE, 2).await.unwrap_err();
        assert_eq!(err, CartError::ItemNotInCart(ONE));
        assert!(h.store.current_cart().is_empty());
        assert!(h.notifier.is_empty());
        assert_eq!(persisted(&h), None);
    }

    #[tokio::test]
    async fn test_update_lookup_failure_notifies() {
        let h = harness(InMemoryCatalog::new().with_product(1, "Runner", 5));
        h.store.add_product(ONE).await.unwrap();
        h.catalog.set_offline(true);

        assert!(h.store.update_product_amount(ONE, 2).await.is_err());
        assert_eq!(h.notifier.messages(), vec!["Could not change product quantity"]);
    }

    #[test]
    fn test_open_hydrates_and_repairs() {
        let storage = Cache::memory();
        storage
            .store()
            .set(
                "cart:default",
                br#"[{"id":1,"amount":2,"title":"Runner"},{"id":2,"amount":0},{"id":1,"amount":7}]"#,
            )
            .unwrap();

        let catalog = Arc::new(InMemoryCatalog::new());
        let notifier: Arc<dyn NotificationSink> = Arc::new(RecordingNotifier::new());
        let store = CartStore::open(
            Collaborators::new(catalog, storage, notifier),
            CartConfig::default(),
        )
        .unwrap();

        let cart = store.current_cart();
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.get_item(ONE).unwrap().amount, 2);
        assert_eq!(cart.get_item(ONE).unwrap().title(), Some("Runner"));
    }

    #[test]
    fn test_open_with_corrupt_storage_starts_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("cart:default", b"<html>").unwrap();

        let store = CartStore::open(
            Collaborators::new(
                Arc::new(InMemoryCatalog::new()),
                Cache::from_shared(backend),
                Arc::new(RecordingNotifier::new()),
            ),
            CartConfig::default(),
        )
        .unwrap();
        assert!(store.current_cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_without_stock_record_notifies() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(Product::new(ONE).with_attribute("title", "Runner"));
        let h = harness(catalog);
        h.store.add_product(ONE).await.unwrap();

        let err = h.store.add_product(ONE).await.unwrap_err();
        assert_eq!(err, CartError::NotFound(ONE));
        assert_eq!(h.store.current_cart().get_item(ONE).unwrap().amount, 1);
        assert_eq!(h.notifier.messages(), vec!["Could not add product"]);
    }

    /// Backend whose reads or writes always fail.
    struct FailingStore {
        reads: bool,
        writes: bool,
    }

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            if self.reads {
                return Err(CacheError::StoreError("disk unavailable".into()));
            }
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            if self.writes {
                return Err(CacheError::StoreError("disk full".into()));
            }
            Ok(())
        }

        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_write_failure_keeps_mutation_without_notifying() {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::open(
            Collaborators::new(
                Arc::new(InMemoryCatalog::new().with_product(1, "Runner", 5)),
                Cache::new(FailingStore {
                    reads: false,
                    writes: true,
                }),
                notifier.clone(),
            ),
            CartConfig::default(),
        )
        .unwrap();

        let cart = store.add_product(ONE).await.unwrap();
        assert_eq!(cart.get_item(ONE).unwrap().amount, 1);
        assert_eq!(store.current_cart(), cart);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_open_with_unreadable_backend_fails() {
        let result = CartStore::open(
            Collaborators::new(
                Arc::new(InMemoryCatalog::new()),
                Cache::new(FailingStore {
                    reads: true,
                    writes: false,
                }),
                Arc::new(RecordingNotifier::new()),
            ),
            CartConfig::default(),
        );
        assert!(matches!(result, Err(CartError::Storage(msg)) if msg.contains("disk unavailable")));
    }
}

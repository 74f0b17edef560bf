//! Cart and line item types.

use crate::catalog::Product;
use crate::error::{CartError, CartResult};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// A shopping cart: line items in insertion order.
///
/// Invariants:
/// - at most one line item per product id;
/// - every line item has `amount >= 1`.
///
/// Every mutating method checks its preconditions before touching the
/// items, so an `Err` always leaves the cart exactly as it was.
///
/// Serializes as a plain JSON array of line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted line items, dropping the ones that break
    /// the cart invariants.
    ///
    /// Returns the repaired cart and the dropped items. For duplicate product
    /// ids the first occurrence wins.
    pub fn from_persisted(items: Vec<LineItem>) -> (Self, Vec<LineItem>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();

        for item in items {
            if item.amount >= 1 && seen.insert(item.product_id) {
                kept.push(item);
            } else {
                dropped.push(item);
            }
        }

        (Self { items: kept }, dropped)
    }

    /// Append a new line item.
    ///
    /// Fails if the amount is not positive or the product is already in
    /// the cart.
    pub fn add_item(&mut self, item: LineItem) -> CartResult<()> {
        if item.amount <= 0 {
            return Err(CartError::InvalidQuantity(item.amount));
        }
        if self.contains(item.product_id) {
            return Err(CartError::DuplicateItem(item.product_id));
        }

        self.items.push(item);
        Ok(())
    }

    /// Set a line item's amount (absolute, not incremental).
    pub fn set_amount(&mut self, product_id: ProductId, amount: i64) -> CartResult<()> {
        if amount <= 0 {
            return Err(CartError::InvalidQuantity(amount));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotInCart(product_id))?;
        item.amount = amount;
        Ok(())
    }

    /// Remove a line item, returning it.
    pub fn remove_item(&mut self, product_id: ProductId) -> CartResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotInCart(product_id))?;
        Ok(self.items.remove(index))
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Get a line item by product id.
    pub fn get_item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get_item(product_id).is_some()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Amount in cart per product, for "already in cart" badges.
    pub fn amounts_by_product(&self) -> BTreeMap<ProductId, i64> {
        self.items.iter().map(|i| (i.product_id, i.amount)).collect()
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product being purchased.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Quantity, always at least 1 inside a cart.
    pub amount: i64,
    /// Product attributes copied from the product lookup.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl LineItem {
    /// Create a line item with no attributes.
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self {
            product_id,
            amount,
            attributes: Map::new(),
        }
    }

    /// First line item for a product: amount 1, attributes copied over.
    pub fn from_product(product: Product) -> Self {
        let mut attributes = product.attributes;
        // The cart owns `amount`; never let a catalog field shadow it.
        attributes.remove("amount");
        Self {
            product_id: product.id,
            amount: 1,
            attributes,
        }
    }

    /// Look up a single attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The `title` attribute, when present and a string.
    pub fn title(&self) -> Option<&str> {
        self.attribute("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_item_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new(id(3), 1)).unwrap();
        cart.add_item(LineItem::new(id(1), 2)).unwrap();

        let ids: Vec<u64> = cart.items().iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new(id(1), 1)).unwrap();
        let before = cart.clone();

        let err = cart.add_item(LineItem::new(id(1), 4)).unwrap_err();
        assert_eq!(err, CartError::DuplicateItem(id(1)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_non_positive_rejected() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(LineItem::new(id(1), 0)),
            Err(CartError::InvalidQuantity(0))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_amount() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new(id(1), 1)).unwrap();

        cart.set_amount(id(1), 5).unwrap();
        assert_eq!(cart.get_item(id(1)).unwrap().amount, 5);

        assert_eq!(cart.set_amount(id(1), 0), Err(CartError::InvalidQuantity(0)));
        assert_eq!(cart.set_amount(id(2), 1), Err(CartError::ItemNotInCart(id(2))));
        assert_eq!(cart.get_item(id(1)).unwrap().amount, 5);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new(id(1), 1)).unwrap();
        cart.add_item(LineItem::new(id(2), 1)).unwrap();

        let removed = cart.remove_item(id(1)).unwrap();
        assert_eq!(removed.product_id, id(1));
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.remove_item(id(1)), Err(CartError::ItemNotInCart(id(1))));
    }

    #[test]
    fn test_from_persisted_drops_invalid() {
        let items = vec![
            LineItem::new(id(1), 2),
            LineItem::new(id(2), 0),
            LineItem::new(id(1), 9),
            LineItem::new(id(3), 1),
        ];

        let (cart, dropped) = Cart::from_persisted(items);
        assert_eq!(cart.items(), &[LineItem::new(id(1), 2), LineItem::new(id(3), 1)]);
        assert_eq!(dropped.len(), 2);
    }

    #[test]
    fn test_amounts_by_product() {
        let mut cart = Cart::new();
        cart.add_item(LineItem::new(id(2), 3)).unwrap();
        cart.add_item(LineItem::new(id(1), 1)).unwrap();

        let amounts = cart.amounts_by_product();
        assert_eq!(amounts.get(&id(2)), Some(&3));
        assert_eq!(amounts.get(&id(1)), Some(&1));
    }

    #[test]
    fn test_line_item_from_product_strips_amount() {
        let product = Product::new(id(4))
            .with_attribute("title", "Runner")
            .with_attribute("amount", 99);

        let item = LineItem::from_product(product);
        assert_eq!(item.amount, 1);
        assert_eq!(item.title(), Some("Runner"));
        assert!(item.attribute("amount").is_none());
    }

    #[test]
    fn test_cart_json_shape() {
        let mut cart = Cart::new();
        let product = Product::new(id(1)).with_attribute("title", "Runner");
        cart.add_item(LineItem::from_product(product)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "id": 1, "amount": 1, "title": "Runner" }])
        );
    }
}

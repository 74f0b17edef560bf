//! Cart error types.

use crate::ids::ProductId;
use thiserror::Error;

/// Failure reported by a product or stock lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The remote service has no record for this product.
    #[error("No record for product {0}")]
    NotFound(ProductId),

    /// The remote service could not be reached or answered with an error.
    #[error("Lookup failed: {0}")]
    Network(String),
}

/// Errors that can occur in cart operations.
///
/// None of these escape a [`CartStore`](crate::CartStore) operation as a
/// panic; they are returned as values and, depending on the operation,
/// reported through the notification sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Product or stock record absent.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Lookup collaborator unreachable or errored.
    #[error("Network error: {0}")]
    Network(String),

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Mutation targets a product absent from the cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(ProductId),

    /// A line item for this product is already in the cart.
    #[error("Item already in cart: {0}")]
    DuplicateItem(ProductId),

    /// Quantity is zero or negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The persisted cart could not be read.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<LookupError> for CartError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::NotFound(id) => CartError::NotFound(id),
            LookupError::Network(msg) => CartError::Network(msg),
        }
    }
}

impl From<cart_cache::CacheError> for CartError {
    fn from(e: cart_cache::CacheError) -> Self {
        CartError::Storage(e.to_string())
    }
}

/// Result alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

//! Cart configuration.

use serde::{Deserialize, Serialize};

/// Settings for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key the cart is persisted under.
    pub storage_key: String,

    /// User-facing notification texts.
    pub messages: Messages,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            messages: Messages::default(),
        }
    }
}

impl CartConfig {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

fn default_storage_key() -> String {
    cart_cache::cache_key!("cart", "default")
}

/// Notification texts, one per failure class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Requested quantity exceeds stock.
    pub out_of_stock: String,
    /// Adding a product failed.
    pub add_failed: String,
    /// Removing a product failed.
    pub remove_failed: String,
    /// Changing a quantity failed.
    pub update_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            out_of_stock: "Requested quantity is out of stock".to_string(),
            add_failed: "Could not add product".to_string(),
            remove_failed: "Could not remove product".to_string(),
            update_failed: "Could not change product quantity".to_string(),
        }
    }
}

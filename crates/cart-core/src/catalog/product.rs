//! Product descriptions.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as returned by the product lookup.
///
/// Everything except the id is opaque to the cart: attributes are carried
/// into the line item as-is and written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Descriptive attributes (title, price, image, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with no attributes.
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
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

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{"id":3,"title":"Sneaker","price":139.9,"image":"https://img/3.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.title(), Some("Sneaker"));
        assert_eq!(product.attribute("price"), Some(&Value::from(139.9)));
        assert!(product.attribute("id").is_none());
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new(ProductId::new(1)).with_attribute("title", "Boot");
        assert_eq!(product.title(), Some("Boot"));
    }
}

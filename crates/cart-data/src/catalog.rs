//! Stock and product lookups over HTTP.

use crate::FetchClient;
use async_trait::async_trait;
use cart_core::catalog::{Product, StockRecord};
use cart_core::ports::{ProductLookup, StockLookup};
use cart_core::{LookupError, ProductId};
use serde::de::DeserializeOwned;

/// Catalog API client.
///
/// No timeout or retry is applied: a lookup that never answers keeps the
/// cart operation waiting on it.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: FetchClient,
    stock_path: String,
    products_path: String,
}

impl HttpCatalog {
    /// Create a catalog using the default `/stock` and `/products` routes.
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            stock_path: "/stock".to_string(),
            products_path: "/products".to_string(),
        }
    }

    /// Override the route prefixes.
    pub fn with_paths(mut self, stock: impl Into<String>, products: impl Into<String>) -> Self {
        self.stock_path = stock.into();
        self.products_path = products.into();
        self
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        product_id: ProductId,
    ) -> Result<T, LookupError> {
        let url = format!("{}/{}", path.trim_end_matches('/'), product_id);
        let result = async {
            self.client
                .get(url.as_str())
                .accept("application/json")
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
        }
        .await;

        result.map_err(|e| {
            tracing::debug!(%product_id, url = %url, error = %e, "catalog lookup failed");
            e.into_lookup(product_id)
        })
    }
}

#[async_trait]
impl StockLookup for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        let mut record: StockRecord = self.fetch(&self.stock_path, product_id).await?;
        record.product_id = product_id;
        Ok(record)
    }
}

#[async_trait]
impl ProductLookup for HttpCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError> {
        self.fetch(&self.products_path, product_id).await
    }
}

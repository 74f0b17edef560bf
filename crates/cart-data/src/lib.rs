//! HTTP product and stock lookups for the cart workspace.
//!
//! Provides a small fetch client with a builder API and JSON handling, and
//! [`HttpCatalog`], which serves the cart's stock and product lookups from a
//! REST API laid out as `GET {base}/stock/{id}` and `GET {base}/products/{id}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_data::{FetchClient, HttpCatalog};
//!
//! let client = FetchClient::reqwest().with_base_url("http://localhost:3333");
//! let catalog = HttpCatalog::new(client);
//!
//! let stock = catalog.stock(ProductId::new(1)).await?;
//! ```

mod catalog;
mod error;
mod request;
mod response;
mod transport;

pub use catalog::HttpCatalog;
pub use error::FetchError;
pub use request::RequestBuilder;
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

use std::sync::Arc;

/// HTTP client for making outbound requests.
///
/// A thin layer over a [`Transport`] that resolves relative URLs against a
/// base URL.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
}

impl FetchClient {
    /// Create a client over any transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: None,
        }
    }

    /// Create a client backed by `reqwest`.
    pub fn reqwest() -> Self {
        Self::new(ReqwestTransport::new())
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !is_absolute(&url) => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url,
        };

        ClientRequestBuilder {
            transport: Arc::clone(&self.transport),
            builder: RequestBuilder::get(full_url),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// The request as it will be sent.
    pub fn build(self) -> RequestBuilder {
        self.builder
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        tracing::debug!(url = %self.builder.url, "sending request");
        self.transport.send(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpCatalog, Response, Transport};
}

//! `HttpCatalog` over a real HTTP round trip.

use cart_core::ports::{ProductLookup, StockLookup};
use cart_core::{LookupError, ProductId};
use cart_data::{FetchClient, HttpCatalog};

#[tokio::test]
async fn test_lookups_against_json_api() {
    let mut server = mockito::Server::new_async().await;
    let stock = server
        .mock("GET", "/stock/1")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"amount":3}"#)
        .create_async()
        .await;
    let product = server
        .mock("GET", "/products/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"title":"Walking Sneaker","price":179.9}"#)
        .create_async()
        .await;

    let catalog = HttpCatalog::new(FetchClient::reqwest().with_base_url(server.url()));

    let record = catalog.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(record.amount, 3);

    let found = catalog.product(ProductId::new(1)).await.unwrap();
    assert_eq!(found.title(), Some("Walking Sneaker"));

    stock.assert_async().await;
    product.assert_async().await;
}

#[tokio::test]
async fn test_not_found_route() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/stock/42")
        .with_status(404)
        .with_body("{}")
        .create_async()
        .await;

    let catalog = HttpCatalog::new(FetchClient::reqwest().with_base_url(server.url()));
    assert_eq!(
        catalog.stock(ProductId::new(42)).await,
        Err(LookupError::NotFound(ProductId::new(42)))
    );
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let catalog = HttpCatalog::new(FetchClient::reqwest().with_base_url("http://127.0.0.1:9"));
    assert!(matches!(
        catalog.product(ProductId::new(1)).await,
        Err(LookupError::Network(_))
    ));
}

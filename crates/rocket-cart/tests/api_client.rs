//! `ApiClient` against a local storefront served by axum.

use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use rocket_cart::{ApiClient, ApiError, CartEngine, ProductCatalog, StockOracle};
use rocket_core::{NoticeKind, ProductId};
use rocket_db::{Database, DbConfig};

async fn stock(Path(id): Path<u64>) -> Response {
    match id {
        1 => Json(json!({ "id": 1, "amount": 3 })).into_response(),
        2 => Json(json!({ "id": 2, "amount": 0 })).into_response(),
        13 => "<html>maintenance</html>".into_response(),
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(Path(id): Path<u64>) -> Response {
    match id {
        1 | 2 => Json(json!({
            "id": id,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://cdn.rocketshoes.test/tenis1.jpg"
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves the storefront under `prefix` and returns the base URL.
async fn serve(prefix: &str) -> String {
    let routes = Router::new()
        .route("/stock/{id}", get(stock))
        .route("/products/{id}", get(product));

    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}{prefix}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_stock() {
    let api = client(&serve("").await);

    let stock = api.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(stock.id, ProductId::new(1));
    assert_eq!(stock.amount, 3);
}

#[tokio::test]
async fn fetches_product_with_display_fields() {
    let api = client(&serve("").await);

    let product = api.product(ProductId::new(1)).await.unwrap();

    assert_eq!(product.id, ProductId::new(1));
    assert_eq!(product.amount, None);
    assert_eq!(
        product.attributes.get("title").and_then(|v| v.as_str()),
        Some("Tênis de Caminhada Leve Confortável")
    );
    assert_eq!(
        product.attributes.get("image").and_then(|v| v.as_str()),
        Some("https://cdn.rocketshoes.test/tenis1.jpg")
    );
}

#[tokio::test]
async fn resolves_paths_under_base_path() {
    let api = client(&serve("/api").await);

    assert_eq!(api.stock(ProductId::new(1)).await.unwrap().amount, 3);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let api = client(&serve("").await);

    let err = api.stock(ProductId::new(404)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { resource: "stock", .. }));

    let err = api.product(ProductId::new(404)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { resource: "products", .. }));
}

#[tokio::test]
async fn server_error_is_status() {
    let api = client(&serve("").await);

    let err = api.stock(ProductId::new(500)).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let api = client(&serve("").await);

    let err = api.stock(ProductId::new(13)).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"));
    let err = api.stock(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn engine_over_http_and_sqlite() {
    let api = client(&serve("").await);
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let (notifier, mut notices) = rocket_cart::ChannelNotifier::new();

    let engine = CartEngine::builder()
        .api(api)
        .store(db)
        .notifier(notifier)
        .open()
        .await
        .unwrap();

    assert!(engine.add_product(ProductId::new(1)).await.is_committed());
    assert!(!engine.add_product(ProductId::new(2)).await.is_committed());
    assert!(!engine.add_product(ProductId::new(404)).await.is_committed());

    let cart = engine.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(ProductId::new(1)).map(|e| e.amount), Some(1));

    assert_eq!(notices.recv().await.unwrap().kind, NoticeKind::OutOfStock);
    assert_eq!(notices.recv().await.unwrap().kind, NoticeKind::AddFailed);
}

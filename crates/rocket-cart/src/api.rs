//! # Storefront API
//!
//! The two external lookups the engine performs, and the HTTP client that
//! serves both.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront API                                     │
//! │                                                                         │
//! │  StockOracle::stock(id)       GET {base}/stock/{id}                    │
//! │                               → { "id": 1, "amount": 3 }               │
//! │                                                                         │
//! │  ProductCatalog::product(id)  GET {base}/products/{id}                 │
//! │                               → { "id": 1, "title": "...",             │
//! │                                   "price": 179.9, "image": "..." }     │
//! │                                                                         │
//! │  404           → ApiError::NotFound                                    │
//! │  other non-2xx → ApiError::Status                                      │
//! │  bad body      → ApiError::Decode                                      │
//! │  network       → ApiError::Transport                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither lookup is cached: the engine asks again on every mutation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use rocket_core::{Product, ProductId, Stock};

use crate::error::ApiError;

/// Reports how many units of a product are currently available.
#[async_trait]
pub trait StockOracle: Send + Sync {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}

/// Provides the descriptive record of a product.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

#[async_trait]
impl<T: StockOracle + ?Sized> StockOracle for Arc<T> {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        (**self).stock(id).await
    }
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        (**self).product(id).await
    }
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP client for the storefront API.
///
/// Cheap to clone: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// `timeout` bounds every request; it is the only escape from a hung
    /// lookup, the engine itself never cancels one.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(ApiClient { client, base_url })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, ApiError> {
        Ok(self.base_url.join(&format!("{}/{}", resource, id))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        id: ProductId,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(resource, id)?;
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { resource, id });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StockOracle for ApiClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock: Stock = self.get_json("stock", id).await?;
        debug!(available = stock.amount, "Stock received");
        Ok(stock)
    }
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_json("products", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("http://localhost:3333/api", TIMEOUT).unwrap();

        assert_eq!(
            client.endpoint("stock", ProductId::new(2)).unwrap().as_str(),
            "http://localhost:3333/api/stock/2"
        );
    }

    #[test]
    fn test_endpoint_at_root() {
        let client = ApiClient::new("http://localhost:3333", TIMEOUT).unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:3333/");
        assert_eq!(
            client.endpoint("products", ProductId::new(7)).unwrap().as_str(),
            "http://localhost:3333/products/7"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", TIMEOUT),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:shop@example.test", TIMEOUT),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}

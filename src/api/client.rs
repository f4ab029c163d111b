use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::Product;
use crate::error::{FetchError, Result};

/// Default bound on a single-product request.
pub const DEFAULT_PRODUCT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of product data.
///
/// The stores only depend on this trait, so tests can substitute a scripted
/// implementation for the HTTP client.
pub trait ProductApi: Send + Sync + 'static {
    /// `GET /products`
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, FetchError>> + Send;

    /// `GET /products/{id}`
    fn fetch_product(&self, id: &str) -> impl Future<Output = Result<Product, FetchError>> + Send;
}

/// JSON-over-HTTP client for the remote product API.
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    base_url: String,
    product_timeout: Duration,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            product_timeout: DEFAULT_PRODUCT_TIMEOUT,
        })
    }

    /// Bound applied to [`fetch_product`](ProductApi::fetch_product).
    pub fn with_product_timeout(mut self, timeout: Duration) -> Self {
        self.product_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl ProductApi for HttpProductApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        self.get_json(&format!("{}/products", self.base_url)).await
    }

    async fn fetch_product(&self, id: &str) -> Result<Product, FetchError> {
        let url = format!("{}/products/{}", self.base_url, id);
        tokio::time::timeout(self.product_timeout, self.get_json(&url))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}

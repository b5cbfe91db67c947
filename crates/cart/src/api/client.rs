//! HTTP implementation of the stock and product ports.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ProductApi, StockApi};
use crate::config::ApiConfig;

/// Maximum number of body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the stock and product service.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Resolve `{base}/{resource}/{id}`.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    /// GET a JSON document.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(url = %url, "GET");

        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %truncate(&body),
                "Catalog service returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %truncate(&body),
                "Failed to parse catalog response"
            );
            ApiError::Parse(e)
        })
    }
}

impl StockApi for CatalogClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let url = self.endpoint("stock", id)?;
        self.get_json(url).await
    }
}

impl ProductApi for CatalogClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint("products", id)?;
        let product: Product = self.get_json(url).await?;

        if product.id != id {
            return Err(ApiError::UnexpectedProduct {
                requested: id,
                received: product.id,
            });
        }

        Ok(product)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

//! Stock and product query clients.
//!
//! # Architecture
//!
//! - The store talks to two read-only ports, [`StockApi`] and [`ProductApi`]
//! - [`CatalogClient`] implements both over HTTP with `reqwest`
//! - Every call goes to the network: no caching, no retries
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` - `{ "amount": 3 }`
//! - `GET {base}/products/{id}` - `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`

mod client;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use client::CatalogClient;

/// Errors that can occur when querying the stock or product service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product service answered with a different product.
    #[error("Requested product {requested} but received {received}")]
    UnexpectedProduct {
        requested: ProductId,
        received: ProductId,
    },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Read-only lookup of available stock.
pub trait StockApi {
    /// Current stock level for `id`.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send;
}

/// Read-only lookup of product metadata.
pub trait ProductApi {
    /// Metadata for `id`.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

impl<T: StockApi + ?Sized> StockApi for &T {
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send {
        (**self).stock(id)
    }
}

impl<T: ProductApi + ?Sized> ProductApi for &T {
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).product(id)
    }
}

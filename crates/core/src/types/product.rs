//! Catalog records returned by the remote product and stock services.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;

/// Product metadata as served by `GET /products/{id}`.
///
/// The cart only relies on `id`; the remaining fields are carried for
/// display. Fields the cart does not know about are kept in `extra` so a
/// snapshot written by this crate round-trips everything the service sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra metadata.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// Stock level as served by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Units currently available.
    pub amount: u32,
}

impl Stock {
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self { amount }
    }

    /// Whether `amount` units can be reserved.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        self.amount >= amount
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.amount == 0
    }
}

//! Cart operation errors and their user-facing notices.
//!
//! Errors never leave the store: each operation maps its [`CartError`] to a
//! [`Notice`] (or to nothing) and reports failure as `false`.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::notify::Notice;
use crate::storage::StorageError;

/// Reasons a cart operation did not commit.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount exceeds available stock.
    #[error("Product {product_id} has {available} in stock, {requested} requested")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested amount is below 1.
    #[error("Invalid amount {0}")]
    InvalidAmount(i64),

    /// Stock service reports no units at all.
    #[error("Product {0} is out of stock")]
    StockDepleted(ProductId),

    /// Stock or product lookup failed.
    #[error("Catalog error: {0}")]
    Api(#[from] ApiError),

    /// Snapshot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    /// Notice for infrastructure failures during this operation.
    #[must_use]
    pub const fn failure_notice(self) -> Notice {
        match self {
            Self::Add => Notice::AddFailed,
            Self::Remove => Notice::RemoveFailed,
            Self::Update => Notice::UpdateFailed,
        }
    }
}

impl CartError {
    /// Notice to surface when `operation` fails with this error.
    ///
    /// `None` means the failure is reported to the caller only.
    #[must_use]
    pub const fn notice(&self, operation: Operation) -> Option<Notice> {
        match (self, operation) {
            (Self::InvalidAmount(_) | Self::StockDepleted(_), Operation::Update) => None,
            (Self::OutOfStock { .. } | Self::StockDepleted(_), _)
            | (Self::NotInCart(_), Operation::Update) => Some(Notice::OutOfStock),
            _ => Some(operation.failure_notice()),
        }
    }
}

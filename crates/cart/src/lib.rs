//! RocketShoes Cart - Stock-validated shopping cart state.
//!
//! Keeps the shopper's cart in memory, writes every change through to a
//! local key-value store, and checks each change against the remote stock
//! service before applying it.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and is the only way to mutate it
//! - [`api`] ports for stock and product lookups, with an HTTP client
//! - [`storage`] snapshot persistence over a key-value backend
//! - [`notify`] sink for user-facing messages on rejected operations
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let mut store = CartStore::from_config(&config, TracingNotifier)?;
//!
//! store.add_product(ProductId::new(1)).await;
//! store.update_product_amount(AmountUpdate::new(ProductId::new(1), 3)).await;
//! store.remove_product(ProductId::new(1));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use api::{ApiError, CatalogClient, ProductApi, StockApi};
pub use config::{ApiConfig, CartConfig, ConfigError, StorageConfig};
pub use error::{CartError, Operation};
pub use notify::{MemoryNotifier, Notice, Notifier, TracingNotifier};
pub use storage::{CartStorage, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;

//! Local persistence of the cart snapshot.
//!
//! The snapshot lives under a single key of a string key-value store, the
//! same contract a browser's local storage offers. [`CartStorage`] is the
//! adapter the store writes through; [`KeyValueStore`] is the backend seam.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local, for tests and embedding
//! - [`FileStore`] - one JSON file, replaced atomically on every write

mod file;
mod memory;

use rocketshoes_core::Cart;
use thiserror::Error;
use tracing::debug;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored snapshot is not a valid cart.
    #[error("Corrupt snapshot under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Cart could not be serialized.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backend file is not a key-value document.
    #[error("Invalid storage file {path}: {reason}")]
    InvalidBackend { path: String, reason: String },
}

/// String key-value store with local-storage semantics.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if never set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Reads and writes the cart snapshot under a fixed key.
#[derive(Debug, Clone)]
pub struct CartStorage<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CartStorage<S> {
    /// Create an adapter storing the snapshot under `key`.
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Key the snapshot is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Last committed cart, or an empty cart if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored value is not a cart, or
    /// any backend read error.
    pub fn load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.backend.get_item(&self.key)? else {
            debug!(key = %self.key, "No stored cart snapshot");
            return Ok(Cart::empty());
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: self.key.clone(),
            source,
        })
    }

    /// Overwrite the stored snapshot with `cart`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart).map_err(StorageError::Encode)?;
        self.backend.set_item(&self.key, raw)?;
        debug!(key = %self.key, items = cart.len(), "Saved cart snapshot");
        Ok(())
    }
}

//! File-backed key-value store.
//!
//! All keys live in one JSON object. Writes go to a sibling temp file that
//! is then renamed over the original, so readers see either the old or the
//! new document and never a partial one. A file that is not a key-value
//! document is replaced by the next write.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Key-value store persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| StorageError::InvalidBackend {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(items).map_err(StorageError::Encode)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), keys = items.len(), "Wrote storage file");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(StorageError::InvalidBackend { path, reason }) => {
                warn!(%path, %reason, "Replacing unreadable storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        items.insert(key.to_string(), value);
        self.write_all(&items)
    }
}

// Durable key-value storage for gallery items
mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::media::{MediaId, MediaItem};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const DEFAULT_ITEMS_KEY: &str = "galleryItems";

/// String-keyed store holding whole JSON documents. Writes replace the
/// entire value for a key; there is no locking across writers.
pub trait DurableStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub type DynDurableStore = Arc<dyn DurableStore>;

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// The persisted item collection: a JSON array of [`MediaItem`] under a
/// single key, newest first.
///
/// Clones share one write lock, so read-modify-write cycles made through
/// the same collection never interleave. Separate processes writing the
/// same key are not coordinated.
#[derive(Clone)]
pub struct PersistedItems {
    store: DynDurableStore,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl PersistedItems {
    pub fn new(store: DynDurableStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Strict read: absent key is an empty collection, anything else that
    /// goes wrong is an error.
    pub fn try_load(&self) -> Result<Vec<MediaItem>, StorageError> {
        match self.store.read(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Lenient read used by the gallery: read failures and malformed data
    /// degrade to an empty collection.
    pub fn load(&self) -> Vec<MediaItem> {
        match self.try_load() {
            Ok(items) => {
                debug!("Loaded {} persisted items from '{}'", items.len(), self.key);
                items
            }
            Err(e) => {
                warn!(
                    "Failed to read persisted items from '{}', treating as empty: {}",
                    self.key, e
                );
                Vec::new()
            }
        }
    }

    pub fn save(&self, items: &[MediaItem]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.store.write(&self.key, &json)
    }

    /// Read-modify-write of the whole collection. The closure reports
    /// whether it changed anything; unchanged collections are not written.
    pub fn update<F>(&self, f: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut Vec<MediaItem>) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut items = self.load();
        if !f(&mut items) {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    pub fn prepend(&self, item: MediaItem) -> Result<(), StorageError> {
        self.update(|items| {
            items.retain(|existing| existing.id != item.id);
            items.insert(0, item);
            true
        })
        .map(|_| ())
    }

    pub fn remove(&self, id: &MediaId) -> Result<bool, StorageError> {
        self.update(|items| {
            let before = items.len();
            items.retain(|item| &item.id != id);
            items.len() != before
        })
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.store.remove(&self.key)
    }
}

use crate::storage::{Storage, StorageKey};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// PERSISTED STORE - One value kept in sync with one storage entry
// ============================================================================
/// Holds a single map or sequence and mirrors it to `storage` under `key`.
///
/// The in-memory value is authoritative. It is read once on `open`, and every
/// `update` writes the whole value back before returning. Reads that fail
/// fall back to `T::default()` and writes that fail are dropped; both are
/// logged, neither reaches the caller.
pub struct PersistedStore<T> {
    key: StorageKey,
    storage: Arc<dyn Storage>,
    value: T,
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn open(key: StorageKey, storage: Arc<dyn Storage>) -> Self {
        let value = load(storage.as_ref(), key);
        Self {
            key,
            storage,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Re-read the durable copy. Does not touch the in-memory value.
    pub fn load(&self) -> T {
        load(self.storage.as_ref(), self.key)
    }

    /// Mutate the value and write it back. Returns whatever `f` returns.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.value);
        self.save();
        out
    }

    /// Write the current value. Returns `false` if the write was dropped.
    pub fn save(&self) -> bool {
        save(self.storage.as_ref(), self.key, &self.value)
    }
}

/// Read `key`, substituting the empty value for anything absent or unreadable.
pub fn load<T>(storage: &dyn Storage, key: StorageKey) -> T
where
    T: DeserializeOwned + Default,
{
    let text = match storage.get_item(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("No stored value for {}, starting empty", key);
            return T::default();
        }
        Err(e) => {
            warn!("Storage read failed, starting empty: {}", e);
            return T::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        warn!("Malformed value under {}, starting empty: {}", key, e);
        T::default()
    })
}

/// Serialize `value` and write it under `key`. Failures are logged and dropped.
pub fn save<T>(storage: &dyn Storage, key: StorageKey, value: &T) -> bool
where
    T: Serialize,
{
    let text = match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not serialize {}: {}", key, e);
            return false;
        }
    };

    match storage.set_item(key, &text) {
        Ok(()) => true,
        Err(e) => {
            warn!("Storage write dropped, keeping in-memory state: {}", e);
            false
        }
    }
}

use dashmap::DashMap;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

// ============================================================================
// STORAGE KEYS - One fixed, non-overlapping entry per persisted store
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Likes,
    Saves,
    Follows,
    Comments,
    CreatedMeta,
    Messages,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::Likes,
        StorageKey::Saves,
        StorageKey::Follows,
        StorageKey::Comments,
        StorageKey::CreatedMeta,
        StorageKey::Messages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Likes => "vv_likes",
            StorageKey::Saves => "vv_saves",
            StorageKey::Follows => "vv_follows",
            StorageKey::Comments => "vv_comments_small",
            StorageKey::CreatedMeta => "vv_created_meta",
            StorageKey::Messages => "vv_messages_small",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ERRORS
// ============================================================================
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {key}: {source}")]
    Read {
        key: StorageKey,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {key}: {source}")]
    Write {
        key: StorageKey,
        #[source]
        source: io::Error,
    },
    #[error("quota exceeded writing {key} ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded {
        key: StorageKey,
        needed: usize,
        quota: usize,
    },
}

// ============================================================================
// STORAGE - Synchronous text key space shared by every persisted store
// ============================================================================
/// Durable text storage.
///
/// Reads and writes are synchronous: a store's write has landed (or failed)
/// by the time the mutating call returns.
pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing has been written under `key` yet.
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { key, source }),
        }
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        // Write then rename so a crash never leaves a half-written entry
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::Write { key, source })?;

        debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

/// `DashMap` = Thread-safe HashMap
/// - Backs the in-process storage used by tests and `VIBEVERSE_STORAGE=memory`
/// - An optional quota rejects writes whose total size would exceed it,
///   the same way a browser's storage quota does
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<StorageKey, String>,
    writes: DashMap<StorageKey, usize>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Seed an entry without counting it as a write.
    pub fn insert_raw(&self, key: StorageKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    /// Number of successful writes under `key`.
    pub fn write_count(&self, key: StorageKey) -> usize {
        self.writes.get(&key).map(|n| *n).unwrap_or(0)
    }

    fn used_without(&self, key: StorageKey) -> usize {
        self.entries
            .iter()
            .filter(|entry| *entry.key() != key)
            .map(|entry| entry.value().len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { key, needed, quota });
            }
        }

        self.entries.insert(key, value.to_string());
        *self.writes.entry(key).or_insert(0) += 1;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

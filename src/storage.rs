//! Persisted local key/value state.
//!
//! The app keeps a tiny amount of state across restarts (the cached auth
//! session). `LocalStore` models a named-key string store; `FileStore`
//! backs it with one file per key under the app data directory, written
//! via a staging file + rename so a crash never leaves a torn value.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

// ═══════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════

/// Named-key persisted string store.
///
/// Values are opaque to the store; callers serialize what they need.
/// `get` is lenient: a missing or unreadable value reads as absent.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors from local store writes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to commit staged value: {0}")]
    Commit(String),
}

// ═══════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════

/// One file per key under a storage directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the default store under the app data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(crate::config::storage_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.val"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged
            .persist(self.path_for(key))
            .map_err(|e| StorageError::Commit(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// MemoryStore — test double
// ═══════════════════════════════════════════════════════════

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

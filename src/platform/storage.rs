// CropCure - platform/storage.rs
//
// Durable key-value storage for small string values (the signed-in user).
//
// Design principles:
// - One file per key inside the platform data directory.
// - Writes are atomic (write→temp, rename→final) so a crash during save
//   never corrupts the previous good value.
// - A missing key is not an error; callers receive `Ok(None)`.
// - The data directory is created on first write; no user action required.

use crate::util::constants::{MAX_STORAGE_ENTRY_BYTES, STORAGE_FILE_EXTENSION};
use crate::util::error::StorageError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Minimal durable key-value interface.
///
/// Implementations must be shareable with background workers, hence the
/// `Send + Sync` bound.
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File-backed storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the storage files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the file path for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{STORAGE_FILE_EXTENSION}"))
    }
}

impl DurableStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key);

        let meta = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Io {
                    path,
                    operation: "stat",
                    source: e,
                })
            }
        };

        if meta.len() > MAX_STORAGE_ENTRY_BYTES {
            return Err(StorageError::EntryTooLarge {
                key: key.to_string(),
                size: meta.len(),
                max_size: MAX_STORAGE_ENTRY_BYTES,
            });
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            // Removed between stat and read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                path,
                operation: "read",
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io {
            path: self.dir.clone(),
            operation: "create directory",
            source: e,
        })?;

        let path = self.entry_path(key);
        let tmp = path.with_extension(format!("{STORAGE_FILE_EXTENSION}.tmp"));

        std::fs::write(&tmp, value.as_bytes()).map_err(|e| StorageError::Io {
            path: tmp.clone(),
            operation: "write",
            source: e,
        })?;

        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StorageError::Io {
                path: path.clone(),
                operation: "rename",
                source: e,
            }
        })?;

        tracing::debug!(key, path = %path.display(), "Storage entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, path = %path.display(), "Storage entry removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io {
                path,
                operation: "remove",
                source: e,
            }),
        }
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Process-local storage. Backs `--no-persist` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_write_read_remove() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        assert!(storage.read("k").unwrap().is_none());
        storage.write("k", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove("k").unwrap();
        assert!(storage.read("k").unwrap().is_none());
        assert!(!storage.entry_path("k").exists());
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.remove("never-written").unwrap();
    }

    /// A leftover temp file from an earlier crash must not break the next write.
    #[test]
    fn test_file_storage_overwrites_stale_temp_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write("k", "first").unwrap();

        let tmp = storage.entry_path("k").with_extension("json.tmp");
        std::fs::write(&tmp, b"garbage").unwrap();

        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
        assert!(!tmp.exists());
    }

    #[test]
    fn test_file_storage_rejects_oversized_entry() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let big = "x".repeat(MAX_STORAGE_ENTRY_BYTES as usize + 1);
        std::fs::write(storage.entry_path("k"), big).unwrap();

        assert!(matches!(
            storage.read("k"),
            Err(StorageError::EntryTooLarge { .. })
        ));
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert!(storage.read("k").unwrap().is_none());
    }
}

//! File-backed durable key-value store.
//!
//! The file holds a single JSON object mapping keys to string values, the
//! same shape as a browser's local storage. Every write rewrites the file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use todolist_core::environment::{Storage, StorageError};

/// Key-value store persisted as a JSON object in one file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStorage {
    /// Store backed by the file at `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
            key: self.path.display().to_string(),
            source,
        })
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());

        let serialized = serde_json::to_string_pretty(&items).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serialized)?;
        tracing::trace!(path = %self.path.display(), key, "Wrote storage file");
        Ok(())
    }
}

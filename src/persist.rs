//! Persisted UI state.
//!
//! A small key-value store used by the feature stores to keep filters,
//! sort order and in-progress edit buffers across sessions. Values are JSON.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON under key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value backing for persisted UI state.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, PersistError>;
    fn set(&self, key: &str, value: &Value) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// Read and decode the value stored under `key`.
pub fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistError> {
    match store.get(key)? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| PersistError::Json {
                key: key.to_string(),
                source,
            }),
    }
}

/// Encode and store `value` under `key`.
pub fn save<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let value = serde_json::to_value(value).map_err(|source| PersistError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &value)
}

/// Backing store selected by the `[storage]` section.
///
/// Files under the resolved state directory, or `None` when
/// `persist_ui_state` is off.
pub fn open_configured(storage: &StorageConfig) -> Option<Arc<dyn KeyValueStore>> {
    if !storage.persist_ui_state {
        debug!("UI state persistence disabled");
        return None;
    }
    let dir = storage.resolved_state_dir();
    debug!(dir = %dir.display(), "Persisting UI state");
    Some(Arc::new(FileKvStore::new(dir)))
}

/// In-memory store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PersistError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), PersistError> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a sibling temp file under an exclusive lock and are renamed
/// into place, so a reader never sees a half-written value.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn io_err(path: &Path, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PersistError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| Self::io_err(&path, e))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PersistError::Json {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_err(&self.dir, e))?;

        let path = self.path_for(key);
        let lock_path = path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| Self::io_err(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| Self::io_err(&lock_path, e))?;

        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
            key: key.to_string(),
            source,
        })?;
        let result = File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(content.as_bytes())?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|e| Self::io_err(&path, e));
        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %e, "Failed to remove temp file");
                }
            }
        }

        if let Err(e) = lock.unlock() {
            warn!(path = %lock_path.display(), error = %e, "Failed to release state lock");
        }
        result
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(&path, e)),
        }
    }
}

use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::lock::{StoreReadLock, StoreWriteLock};
use super::{KeyValueStore, StoreError};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// A store backed by a single JSON object file, one top-level entry per key.
///
/// Each `get` re-reads the file and each `set` rewrites it atomically
/// (temp file + rename) under an advisory lock held in a sibling `.lock`
/// file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        Self {
            path,
            lock_path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let encoded = serde_json::to_vec_pretty(map).map_err(|source| StoreError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&encoded).map_err(io_err)?;
        file.write_all(b"\n").map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _lock = StoreReadLock::acquire(&self.lock_path, self.lock_timeout)?;
        let mut map = self.read_map()?;
        debug!(key, path = %self.path.display(), "store read");
        Ok(map.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _lock = StoreWriteLock::acquire(&self.lock_path, self.lock_timeout)?;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        self.write_map(&map)?;
        debug!(key, path = %self.path.display(), "store write");
        Ok(())
    }
}

//! Persistent key-value seam.
//!
//! Per-task state lives under two keys: [`KNOWN_TASKS_KEY`] holds the last
//! seen fingerprint list and [`COMPLETED_TASKS_KEY`] holds the completion
//! map. Values are plain JSON so any backing store that can hold a blob per
//! key will do.

mod file;
mod lock;
mod memory;

pub use file::JsonFileStore;
pub use lock::{LockError, StoreReadLock, StoreWriteLock};
pub use memory::MemoryStore;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::ErrorCode;

/// Key holding the array of fingerprints seen on the previous fetch.
pub const KNOWN_TASKS_KEY: &str = "knownTasks";

/// Key holding the fingerprint → `true` completion map.
pub const COMPLETED_TASKS_KEY: &str = "completedTasks";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing medium cannot be reached (missing permission, disabled,
    /// lock contention).
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// I/O failure on the backing file.
    #[error("store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored blob (or a value under a key) has the wrong shape.
    #[error("stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable { .. } | Self::Io { .. } | Self::Lock(_) => {
                ErrorCode::StoreUnavailable
            }
            Self::Corrupt { .. } => ErrorCode::StoreCorrupt,
        }
    }

    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Read/write of JSON values by string key.
///
/// Implementations must not cache across calls: every `get` reflects the
/// latest `set`, including writes by other processes.
pub trait KeyValueStore {
    /// Load the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Load and decode a typed value.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the stored JSON does not decode as `T`.
pub fn load<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(key)?
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

/// Encode and store a typed value.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or the write fails.
pub fn save<T: Serialize + ?Sized>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let encoded = serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.set(key, encoded)
}

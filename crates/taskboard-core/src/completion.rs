//! Per-task completion flags.
//!
//! The persisted map only ever holds `true` values: completing a task
//! inserts its fingerprint, un-completing removes the key. Entries for tasks
//! that have left the source are never pruned.
//!
//! Nothing is cached; every call reloads the whole map from the store so a
//! change made by another process is always honored.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::fingerprint::Fingerprint;
use crate::store::{self, COMPLETED_TASKS_KEY, KeyValueStore, StoreError};

/// The persisted fingerprint → completed map.
pub type CompletionMap = BTreeMap<String, bool>;

/// Completion tracking on top of a [`KeyValueStore`].
pub struct CompletionStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CompletionStore<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the full map. An unreachable or corrupt store reads as empty.
    #[must_use]
    pub fn load_map(&self) -> CompletionMap {
        match self.try_load_map() {
            Ok(map) => map,
            Err(err) => {
                warn!(error = %err, "completion map unavailable; treating all tasks as pending");
                CompletionMap::new()
            }
        }
    }

    /// Whether the task with this fingerprint is completed (default `false`).
    #[must_use]
    pub fn is_completed(&self, fingerprint: &Fingerprint) -> bool {
        is_completed_in(&self.load_map(), fingerprint)
    }

    /// Mark a task completed (insert) or pending (remove the key).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the map cannot be read back or written.
    pub fn set_completed(&self, fingerprint: &Fingerprint, completed: bool) -> Result<(), StoreError> {
        let mut map = self.try_load_map()?;
        if completed {
            map.insert(fingerprint.as_str().to_string(), true);
        } else {
            map.remove(fingerprint.as_str());
        }
        store::save(self.store, COMPLETED_TASKS_KEY, &map)?;
        debug!(%fingerprint, completed, "completion updated");
        Ok(())
    }

    /// Flip a task's completion flag and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the map cannot be read or written.
    pub fn toggle(&self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        let next = !is_completed_in(&self.try_load_map()?, fingerprint);
        self.set_completed(fingerprint, next)?;
        Ok(next)
    }

    fn try_load_map(&self) -> Result<CompletionMap, StoreError> {
        Ok(store::load(self.store, COMPLETED_TASKS_KEY)?.unwrap_or_default())
    }
}

/// Lookup against an already-loaded map.
#[must_use]
pub fn is_completed_in(map: &CompletionMap, fingerprint: &Fingerprint) -> bool {
    map.get(fingerprint.as_str()).copied().unwrap_or(false)
}

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{KeyValueStore, StoreError};

/// In-process store. Counts reads and writes so callers can assert on
/// effect counts, and can be switched off to simulate an unavailable store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Value>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.set(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Peek at a value without counting a read.
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            Err(StoreError::unavailable("memory store switched off"))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.check()?;
        self.reads.set(self.reads.get() + 1);
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check()?;
        self.writes.set(self.writes.get() + 1);
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

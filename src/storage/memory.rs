//! In-process preference store.

use std::collections::HashMap;

use super::{PreferenceStore, StorageError};

/// A preference store backed by a `HashMap`.
///
/// Useful for headless hosts and tests. A store created with
/// [`MemoryStore::disabled`] fails every operation with
/// [`StorageError::Unavailable`], which models a host where persistence is
/// switched off.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    disabled: bool,
}

impl MemoryStore {
    /// Creates an empty, working store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects every read and write.
    pub fn disabled() -> Self {
        Self {
            entries: HashMap::new(),
            disabled: true,
        }
    }

    /// Adds an entry, returning the store for chaining.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value under `key` without going through the trait.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

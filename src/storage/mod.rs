//! Preference persistence.
//!
//! A [`PreferenceStore`] is a tiny key-value backend holding the user's
//! explicit theme choice. Backends may be unavailable or fail at any time
//! (disabled storage, quota, privacy modes, unreadable files); the
//! [`ThemeManager`](crate::ThemeManager) absorbs every [`StorageError`] and
//! keeps going with an unpersisted theme.
//!
//! Provided backends:
//!
//! - [`MemoryStore`]: in-process map, optionally permanently disabled
//! - [`FileStore`]: a JSON object on disk
//! - `LocalStorageStore` (wasm32 only, in `crate::web`): browser `localStorage`

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A key-value backend for the persisted theme preference.
pub trait PreferenceStore {
    /// Reads the value stored under `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

//! Pluggable key-value storage for session state.
//!
//! The client persists exactly one value, the bearer token, but stores are
//! plain string key-value maps so a backend can be shared with other
//! app-level settings.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStore;
pub use memory::InMemoryStore;

use crate::error::Result;

/// A string key-value store.
///
/// Implementations must be safe to share between threads; all methods take
/// `&self` and use interior mutability.
pub trait KeyValueStore: core::fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

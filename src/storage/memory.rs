//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStore`], a thread-safe in-memory implementation of
//! [`super::KeyValueStore`]. Ideal for unit and integration tests where
//! file I/O is undesirable, and the default store of the client builders.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{MonalisaError, Result};

/// Thread-safe in-memory key-value store.
///
/// Values live as long as the store; nothing is persisted.
///
/// # Example
///
/// ```rust
/// use monalisa_client::storage::{InMemoryStore, KeyValueStore};
///
/// let store = InMemoryStore::new();
/// store.set("authToken", "abc").unwrap();
/// assert_eq!(store.get("authToken").unwrap().as_deref(), Some("abc"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Stored entries behind a mutex for interior mutability.
    inner: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, op: impl FnOnce(&mut HashMap<String, String>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Wraps a mutex poison error into a [`MonalisaError::Storage`].
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> MonalisaError {
    MonalisaError::Storage(err.to_string().into())
}

impl super::KeyValueStore for InMemoryStore {
    #[inline]
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_lock(|entries| entries.get(key).cloned())
    }

    #[inline]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_lock(|entries| {
            let _old = entries.insert(key.to_owned(), value.to_owned());
        })
    }

    #[inline]
    fn remove(&self, key: &str) -> Result<()> {
        self.with_lock(|entries| {
            let _old = entries.remove(key);
        })
    }
}

//! Bearer-token session backed by a key-value store.
//!
//! A [`Session`] is owned by exactly one client. It holds at most one token,
//! stored under [`SESSION_TOKEN_KEY`]; login sets it, logout clears it and
//! every request reads it.

use secrecy::{ExposeSecret as _, SecretString};

use crate::error::Result;
use crate::storage::{InMemoryStore, KeyValueStore};

/// Key under which the bearer token is persisted.
pub const SESSION_TOKEN_KEY: &str = "authToken";

/// The authenticated session of one client.
#[derive(Debug)]
pub struct Session<S: KeyValueStore = InMemoryStore> {
    /// Backing store.
    store: S,
}

impl Default for Session<InMemoryStore> {
    #[inline]
    fn default() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Creates a session over the given store. A token already present in
    /// the store is picked up.
    #[inline]
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the current token, if any.
    ///
    /// Store failures are logged and treated as "no token", so a broken
    /// store degrades to unauthenticated requests.
    #[inline]
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.store.get(SESSION_TOKEN_KEY) {
            Ok(token) => token.filter(|value| !value.is_empty()).map(SecretString::from),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session token");
                None
            }
        }
    }

    /// Returns `true` if a token is currently stored.
    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persists `token` as the session token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to write.
    #[inline]
    pub fn set_token(&self, token: &SecretString) -> Result<()> {
        tracing::debug!("storing session token");
        self.store.set(SESSION_TOKEN_KEY, token.expose_secret())
    }

    /// Removes the session token. Never fails: store errors are logged.
    #[inline]
    pub fn clear(&self) {
        tracing::debug!("clearing session token");
        if let Err(err) = self.store.remove(SESSION_TOKEN_KEY) {
            tracing::warn!(error = %err, "failed to clear session token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonalisaError;

    /// Store whose every operation fails.
    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(MonalisaError::Storage("disk on fire".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(MonalisaError::Storage("disk on fire".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(MonalisaError::Storage("disk on fire".into()))
        }
    }

    #[test]
    fn new_session_has_no_token() {
        let session: Session = Session::default();
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_token_is_retrievable() {
        let session: Session = Session::default();
        session.set_token(&SecretString::from("tok-1")).unwrap();
        assert_eq!(session.token().unwrap().expose_secret(), "tok-1");
        assert_eq!(
            session.store().get(SESSION_TOKEN_KEY).unwrap().as_deref(),
            Some("tok-1")
        );
    }

    #[test]
    fn clear_removes_token() {
        let session: Session = Session::default();
        session.set_token(&SecretString::from("tok-1")).unwrap();
        session.clear();
        assert!(session.token().is_none());
        session.clear();
        assert!(session.token().is_none());
    }

    #[test]
    fn picks_up_token_already_in_store() {
        let store = InMemoryStore::new();
        store.set(SESSION_TOKEN_KEY, "existing").unwrap();
        let session = Session::new(store);
        assert!(session.is_authenticated());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let store = InMemoryStore::new();
        store.set(SESSION_TOKEN_KEY, "").unwrap();
        assert!(Session::new(store).token().is_none());
    }

    #[test]
    fn broken_store_degrades_gracefully() {
        let session = Session::new(BrokenStore);
        assert!(session.token().is_none());
        session.clear();
        assert!(session.set_token(&SecretString::from("x")).is_err());
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let token = SecretString::from("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}

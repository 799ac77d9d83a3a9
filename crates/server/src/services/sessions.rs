//! In-memory admin session store.
//!
//! A process-wide map from opaque bearer token to admin identity, owned
//! by the application state rather than living in a global. Sessions
//! last for the process lifetime; a restart invalidates all of them by
//! design.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore as _;

use bookstack_core::AdminId;

/// Number of random bytes behind each session token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Concurrent-safe store of active admin sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, AdminId>>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh session for an admin and return its token.
    pub fn create(&self, admin_id: AdminId) -> String {
        let token = mint_token();
        self.write().insert(token.clone(), admin_id);
        token
    }

    /// Look up the admin behind a token. Pure read; never mutates.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<AdminId> {
        self.read().get(token).copied()
    }

    /// Remove a session. Idempotent: removing an absent token is not an
    /// error. Returns whether a session was actually removed.
    pub fn remove(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    /// Atomically replace a token with a freshly minted one for the
    /// same admin. Returns `None` if the old token is not active.
    pub fn rotate(&self, token: &str) -> Option<String> {
        let mut sessions = self.write();
        let admin_id = sessions.remove(token)?;
        let fresh = mint_token();
        sessions.insert(fresh.clone(), admin_id);
        Some(fresh)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether there are no active sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AdminId>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, AdminId>> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Mint a cryptographically unguessable URL-safe token.
fn mint_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let token = store.create(AdminId::new(1));
        assert_eq!(store.get(&token), Some(AdminId::new(1)));
        assert_eq!(store.get("unknown"), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        let token = store.create(AdminId::new(1));
        assert!(store.remove(&token));
        assert!(!store.remove(&token));
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn test_rotate_invalidates_old_token() {
        let store = SessionStore::new();
        let token = store.create(AdminId::new(7));
        let fresh = store.rotate(&token).expect("active token rotates");
        assert_ne!(token, fresh);
        assert_eq!(store.get(&token), None);
        assert_eq!(store.get(&fresh), Some(AdminId::new(7)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rotate_absent_token() {
        let store = SessionStore::new();
        assert!(store.rotate("missing").is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new();
        let a = store.create(AdminId::new(1));
        let b = store.create(AdminId::new(1));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}

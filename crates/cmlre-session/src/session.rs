//! Persisted login session.
//!
//! The signed-in user is stored as its JSON record under one key. The record
//! is trusted as-is on restore; it is not re-validated against the user
//! directory.

use std::sync::Arc;

use cmlre_abac::User;
use serde::Serialize;

use crate::error::{Result, SessionError};
use crate::store::KeyValueStore;

/// Default key for the stored user record.
pub const SESSION_KEY: &str = "cmlre_user";

/// Authentication state after restore, login, logout or switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Reads and writes the stored user record.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, SESSION_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored user, or `None` when nobody is signed in.
    pub fn current(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SessionError::CorruptSession {
                key: self.key.clone(),
                source,
            })
    }

    pub fn save(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("key", &self.key).finish_non_exhaustive()
    }
}

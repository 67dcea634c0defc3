//! Key-value backends for persisted client state.
//!
//! Values are opaque strings (JSON in practice). [`FileStore`] keeps one
//! `<key>.json` file per key under a state directory; [`MemoryStore`] is
//! used in tests and for ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// String-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// Memory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

// ============================================================================
// File
// ============================================================================

/// One file per key under a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the state directory if needed.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir).map_err(|source| StoreError::Io {
            path: state_dir.clone(),
            source,
        })?;
        Ok(Self { state_dir })
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.state_dir.join(format!("{key}.json")))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("cmlre_user").unwrap(), None);

        store.set("cmlre_user", r#"{"id":"1"}"#).unwrap();
        assert_eq!(store.get("cmlre_user").unwrap().as_deref(), Some(r#"{"id":"1"}"#));

        store.set("cmlre_user", r#"{"id":"2"}"#).unwrap();
        assert_eq!(store.get("cmlre_user").unwrap().as_deref(), Some(r#"{"id":"2"}"#));

        store.remove("cmlre_user").unwrap();
        assert_eq!(store.get("cmlre_user").unwrap(), None);
        store.remove("cmlre_user").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let temp = TempDir::new().unwrap();
        exercise(&FileStore::open(temp.path().join("state")).unwrap());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        FileStore::open(temp.path())
            .unwrap()
            .set("user-settings", "{}")
            .unwrap();

        let reopened = FileStore::open(temp.path()).unwrap();
        assert_eq!(reopened.get("user-settings").unwrap().as_deref(), Some("{}"));
        assert!(temp.path().join("user-settings.json").exists());
    }

    #[test_case("" ; "empty")]
    #[test_case("../escape" ; "parent traversal")]
    #[test_case("a/b" ; "separator")]
    #[test_case("user settings" ; "space")]
    fn test_file_store_rejects_bad_keys(key: &str) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        assert!(matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))));
    }
}

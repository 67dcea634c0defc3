//! Error types for session and settings persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the key-value backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid store key '{0}': use letters, digits, '-' or '_'")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Errors from the session, directory and settings layers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored session under '{key}' is corrupt: {source}")]
    CorruptSession {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Unknown user: '{0}'")]
    UnknownUser(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

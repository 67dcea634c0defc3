//! Audit error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to write audit log at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Audit sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("Corrupt audit record at {path}:{line}: {source}")]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;

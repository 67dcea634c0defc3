//! Audit sinks.
//!
//! A sink receives each entry once, in the order the logger produced it.
//! Sinks are append-only: none of them exposes mutation or deletion.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::entry::{AuditLogEntry, AuditQuery};
use crate::error::{AuditError, Result};

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
    /// Appends one entry.
    fn write(&self, entry: &AuditLogEntry) -> Result<()>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

impl<S: AuditSink + ?Sized> AuditSink for Arc<S> {
    fn write(&self, entry: &AuditLogEntry) -> Result<()> {
        (**self).write(entry)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ============================================================================
// Tracing
// ============================================================================

/// Emits each entry as a structured `tracing` event on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn write(&self, entry: &AuditLogEntry) -> Result<()> {
        let details = entry
            .details
            .as_ref()
            .map(serde_json::Value::to_string)
            .unwrap_or_default();

        info!(
            target: "audit",
            id = %entry.id,
            user_id = %entry.user_id,
            user_name = %entry.user_name,
            action = %entry.action,
            resource = %entry.resource,
            timestamp = %entry.timestamp.to_rfc3339(),
            details = %details,
            "[AUDIT]"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

// ============================================================================
// Memory
// ============================================================================

/// In-process append-only log with query support.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries are pushed whole; a poisoned lock still guards a complete log.
    fn log(&self) -> MutexGuard<'_, Vec<AuditLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.log().clone()
    }

    /// Returns the entries matching `filter`, oldest first.
    pub fn query(&self, filter: &AuditQuery) -> Vec<AuditLogEntry> {
        filter.apply(self.log().iter()).into_iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.log().len()
    }

    /// Exports the entries matching `filter` as a pretty JSON array.
    pub fn export_json(&self, filter: &AuditQuery) -> Result<String> {
        let entries = self.query(filter);
        serde_json::to_string_pretty(&entries).map_err(AuditError::from)
    }
}

impl AuditSink for MemorySink {
    fn write(&self, entry: &AuditLogEntry) -> Result<()> {
        self.log().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// JSON lines
// ============================================================================

/// Appends entries to a file, one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesSink {
    /// Creates the sink, creating parent directories as needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| AuditError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry from a JSON-lines audit file.
    ///
    /// A missing file reads as empty. Blank lines are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<AuditLogEntry>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(AuditError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| AuditError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|source| AuditError::CorruptRecord {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl AuditSink for JsonLinesSink {
    fn write(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;

        let _guard = self
            .lock
            .lock()
            .map_err(|_| AuditError::SinkUnavailable("audit file lock poisoned".to_string()))?;

        let io_err = |source| AuditError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{line}").map_err(io_err)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

//! Audit logger.
//!
//! [`AuditLogger::log_user_action`] always returns the entry it built. A
//! failing sink is reported through `tracing` and counted, never raised.
//! Callers that need a durable trail use
//! [`AuditLogger::try_log_user_action`] and handle the error themselves.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cmlre_abac::User;
use tracing::warn;

use crate::entry::{AuditLogEntry, RequestOrigin};
use crate::error::Result;
use crate::sink::{AuditSink, TracingSink};

/// Builds audit entries and forwards them to a sink.
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
    origin: RequestOrigin,
    failed_writes: AtomicU64,
}

impl AuditLogger {
    pub fn new(sink: impl AuditSink + 'static) -> Self {
        Self::from_shared(Arc::new(sink))
    }

    /// Uses a sink the caller keeps a handle to (e.g. to query it later).
    pub fn from_shared(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            origin: RequestOrigin::default(),
            failed_writes: AtomicU64::new(0),
        }
    }

    /// Logger writing to the `audit` tracing target.
    pub fn tracing() -> Self {
        Self::new(TracingSink)
    }

    /// Stamps every subsequent entry with `origin`.
    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Records an action. Sink failures are logged and counted.
    pub fn log_user_action(
        &self,
        user: &User,
        action: &str,
        resource: &str,
        details: Option<serde_json::Value>,
    ) -> AuditLogEntry {
        let entry = AuditLogEntry::record(user, action, resource, details, &self.origin);
        if let Err(error) = self.sink.write(&entry) {
            self.failed_writes.fetch_add(1, Ordering::Relaxed);
            warn!(
                sink = self.sink.name(),
                entry_id = %entry.id,
                %error,
                "audit sink write failed"
            );
        }
        entry
    }

    /// Records an action, surfacing sink failures.
    pub fn try_log_user_action(
        &self,
        user: &User,
        action: &str,
        resource: &str,
        details: Option<serde_json::Value>,
    ) -> Result<AuditLogEntry> {
        let entry = AuditLogEntry::record(user, action, resource, details, &self.origin);
        self.sink.write(&entry)?;
        Ok(entry)
    }

    /// Number of writes that failed in [`log_user_action`](Self::log_user_action).
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("sink", &self.sink.name())
            .field("origin", &self.origin)
            .field("failed_writes", &self.failed_writes())
            .finish()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::tracing()
    }
}

//! # cmlre-audit: User Action Audit Trail
//!
//! Every logged action becomes an immutable [`AuditLogEntry`] with a unique
//! id and an ISO-8601 timestamp, forwarded to an injected [`AuditSink`].
//!
//! ```text
//! AuditLogger = {
//!     sink: Arc<dyn AuditSink>,          // tracing | memory | JSON lines
//!     log_user_action(..) -> Entry,      // never fails, counts sink errors
//!     try_log_user_action(..) -> Result, // surfaces sink errors
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cmlre_abac::User;
//! use cmlre_audit::{AuditLogger, AuditQuery, MemorySink};
//! use cmlre_rbac::Role;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = AuditLogger::from_shared(sink.clone());
//!
//! let user = User::new("1", "Aman Antil", "aman.antil@cmlre.gov.in", Role::Scientist);
//! logger.log_user_action(&user, "data_upload", "Oceanographic Survey Data", None);
//!
//! let uploads = sink.query(&AuditQuery::default().with_action("data_upload"));
//! assert_eq!(uploads.len(), 1);
//! ```

pub mod entry;
pub mod error;
pub mod logger;
pub mod sink;

pub use entry::{AuditLogEntry, AuditQuery, RequestOrigin};
pub use error::{AuditError, Result};
pub use logger::AuditLogger;
pub use sink::{AuditSink, JsonLinesSink, MemorySink, TracingSink};

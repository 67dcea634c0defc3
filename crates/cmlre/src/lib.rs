//! # CMLRE Access Control
//!
//! Authorization for the CMLRE marine research data platform.
//!
//! - **Role table** - four roles × twenty capability flags, fixed at compile time
//! - **Contextual checks** - clearance, specialization, data classification, project membership
//! - **Named actions** - upload, survey edits, deletion, restricted access, administration
//! - **Audit trail** - every logged decision becomes an immutable, uniquely identified entry
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         AccessControl                         │
//! │  ┌──────────┐   ┌──────────────┐   ┌─────────┐   ┌─────────┐ │
//! │  │   RBAC   │ → │  Evaluator   │ → │  Gates  │ → │  Audit  │ │
//! │  │ (table)  │   │ (attributes) │   │ (views) │   │ (sinks) │ │
//! │  └──────────┘   └──────────────┘   └─────────┘   └─────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use cmlre::{AccessControl, InputPolicy, PermissionGate, Requirement};
//! use cmlre::{AuditLogger, MemorySink, UserDirectory};
//!
//! let access = AccessControl::new(AuditLogger::new(MemorySink::new()), InputPolicy::FailClosed);
//! let directory = UserDirectory::demo();
//! let yogesh = directory.find_by_email("yogesh@cmlre.gov.in").unwrap();
//!
//! let gate = PermissionGate::new(access.permission_requirement("canEditData").unwrap())
//!     .show_reason(true);
//! let outcome = gate.evaluate(&access, Some(yogesh));
//!
//! assert_eq!(
//!     outcome.notice().unwrap().message,
//!     "Access denied. Reason: Role 'conservationist' does not have permission 'canEditData'",
//! );
//! ```
//!
//! # Modules
//!
//! - **Service**: [`AccessControl`], [`Platform`]
//! - **Gates**: [`PermissionGate`], [`RoleGate`], [`ActionGate`]
//! - **Panel**: [`AccessProfile`]

mod access;
mod error;
mod guard;
mod platform;
mod profile;

pub use access::{AccessControl, AccessError, InputPolicy, Requirement};
pub use error::{CmlreError, Result};
pub use guard::{
    ActionGate, ActionOutcome, ControlState, DenialNotice, GateOutcome, LOGIN_REQUIRED,
    PermissionGate, REPEATED_DENIAL_WARNING, RoleGate,
};
pub use platform::Platform;
pub use profile::{AccessProfile, Capability, DISPLAYED_PERMISSIONS, security_score};

// Re-export the role table
pub use cmlre_rbac::{Permission, PermissionFlags, RbacError, Role, get_flag, has_permission};

// Re-export contextual evaluation
pub use cmlre_abac::{
    AbacError, Action, ClearanceLevel, Decision, DenialReason, EvaluationContext,
    EvaluationResult, Module, User, UserId, accessible_modules, can_access_module,
    can_access_module_named, can_perform_action, can_perform_action_named, evaluate_action,
    has_clearance_level, has_data_classification_access, has_project_access, has_specialization,
    validate_permission,
};

// Re-export audit
pub use cmlre_audit::{
    AuditError, AuditLogEntry, AuditLogger, AuditQuery, AuditSink, JsonLinesSink, MemorySink,
    RequestOrigin, TracingSink,
};

// Re-export session and settings
pub use cmlre_session::{
    AuthState, Authenticator, FileStore, KeyValueStore, MemoryStore, SessionError, SessionStore,
    Settings, SettingsStore, StoreError, UserDirectory,
};

// Re-export configuration
pub use cmlre_config::{AuditSinkKind, CmlreConfig, ConfigLoader, Profile};

//! # cmlre-abac: Contextual Permission Evaluation
//!
//! Extends the role table from `cmlre-rbac` with per-user attributes and
//! per-check context.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Check Request                               │
//! │  (User + Permission + EvaluationContext)     │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Evaluator                                   │
//! │  ├─ Authenticated?                           │
//! │  ├─ Role holds the permission?               │
//! │  ├─ Clearance ≥ required?                    │
//! │  ├─ Specialization held?                     │
//! │  ├─ Data classification granted?             │
//! │  └─ Project member (or admin)?               │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Allowed                                   │
//! │  - Denied(reason of the first failing rule)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use cmlre_abac::{ClearanceLevel, EvaluationContext, User, validate_permission};
//! use cmlre_rbac::{Permission, Role};
//!
//! let user = User::new("2", "Yogesh", "yogesh@cmlre.gov.in", Role::Conservationist)
//!     .with_clearance(ClearanceLevel::Standard);
//!
//! let ctx = EvaluationContext::new().requires_clearance(ClearanceLevel::Advanced);
//! let result = validate_permission(Some(&user), Permission::ViewData, Some(&ctx)).to_result();
//!
//! assert!(!result.allowed);
//! assert_eq!(
//!     result.reason.as_deref(),
//!     Some("Requires clearance level 'advanced' or higher"),
//! );
//! ```

pub mod actions;
pub mod attributes;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod modules;

pub use actions::{Action, can_perform_action, can_perform_action_named, evaluate_action};
pub use attributes::{ClearanceLevel, User, UserId};
pub use context::EvaluationContext;
pub use error::AbacError;
pub use evaluator::{
    Decision, DenialReason, EvaluationResult, has_clearance_level, has_data_classification_access,
    has_project_access, has_specialization, validate_permission,
};
pub use modules::{Module, accessible_modules, can_access_module, can_access_module_named};

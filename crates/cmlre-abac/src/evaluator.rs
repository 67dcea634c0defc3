//! Permission evaluation.
//!
//! Combines the role table with the user's contextual attributes. Denial is
//! an ordinary return value ([`Decision::Denied`]); nothing here panics or
//! returns an error for a well-typed input.

use std::fmt::{self, Display};

use cmlre_rbac::{Permission, Role, has_permission};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attributes::{ClearanceLevel, User};
use crate::context::EvaluationContext;

// ============================================================================
// Decision
// ============================================================================

/// Why a check was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    NotAuthenticated,
    MissingPermission { role: Role, permission: Permission },
    InsufficientClearance { required: ClearanceLevel },
    MissingSpecialization(String),
    ClassificationDenied(String),
    ProjectDenied(String),
    /// A permission name outside the closed flag set.
    UnknownPermission(String),
    /// An action name outside the dispatch table.
    UnknownAction(String),
    /// A module name outside the module table.
    UnknownModule(String),
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NotAuthenticated => f.write_str("User not authenticated"),
            DenialReason::MissingPermission { role, permission } => {
                write!(f, "Role '{role}' does not have permission '{permission}'")
            }
            DenialReason::InsufficientClearance { required } => {
                write!(f, "Requires clearance level '{required}' or higher")
            }
            DenialReason::MissingSpecialization(tag) => {
                write!(f, "Requires specialization in '{tag}'")
            }
            DenialReason::ClassificationDenied(class) => {
                write!(f, "No access to '{class}' classified data")
            }
            DenialReason::ProjectDenied(project) => write!(f, "No access to project '{project}'"),
            DenialReason::UnknownPermission(name) => write!(f, "Unknown permission '{name}'"),
            DenialReason::UnknownAction(name) => write!(f, "Unknown action '{name}'"),
            DenialReason::UnknownModule(name) => write!(f, "Unknown module '{name}'"),
        }
    }
}

/// Outcome of a permission check. A reason exists only on denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Returns the denial reason, or `None` when allowed.
    pub fn reason(&self) -> Option<&DenialReason> {
        match self {
            Decision::Allowed => None,
            Decision::Denied(reason) => Some(reason),
        }
    }

    /// Returns the serializable `{allowed, reason?}` view.
    pub fn to_result(&self) -> EvaluationResult {
        EvaluationResult {
            allowed: self.is_allowed(),
            reason: self.reason().map(ToString::to_string),
        }
    }
}

/// Wire view of a [`Decision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Decision> for EvaluationResult {
    fn from(decision: &Decision) -> Self {
        decision.to_result()
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// True iff the user's clearance (basic if unset) is at least `required`.
pub fn has_clearance_level(user: &User, required: ClearanceLevel) -> bool {
    user.effective_clearance() >= required
}

/// True iff `tag` is one of the user's specializations.
pub fn has_specialization(user: &User, tag: &str) -> bool {
    user.specializations.contains(tag)
}

/// True iff the user is assigned to `project_id`, or is an admin.
///
/// Admin is an unconditional override here, unlike
/// [`has_data_classification_access`].
pub fn has_project_access(user: &User, project_id: &str) -> bool {
    user.project_access.contains(project_id) || user.role == Role::Admin
}

/// True iff `classification` is one of the user's data classifications.
///
/// No admin override.
pub fn has_data_classification_access(user: &User, classification: &str) -> bool {
    user.data_classifications.contains(classification)
}

// ============================================================================
// Validation
// ============================================================================

/// Runs the full permission check.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. a user is present
/// 2. the role holds `permission`
/// 3. clearance, if the context requires one
/// 4. specialization, if required
/// 5. data classification, if set
/// 6. project membership, if set
pub fn validate_permission(
    user: Option<&User>,
    permission: Permission,
    context: Option<&EvaluationContext>,
) -> Decision {
    let decision = evaluate(user, permission, context);
    if let Decision::Denied(reason) = &decision {
        debug!(
            user = user.map(|u| u.id.as_str()),
            permission = %permission,
            %reason,
            "permission check denied"
        );
    }
    decision
}

fn evaluate(
    user: Option<&User>,
    permission: Permission,
    context: Option<&EvaluationContext>,
) -> Decision {
    let Some(user) = user else {
        return Decision::Denied(DenialReason::NotAuthenticated);
    };

    if !has_permission(user.role, permission) {
        return Decision::Denied(DenialReason::MissingPermission {
            role: user.role,
            permission,
        });
    }

    let Some(ctx) = context else {
        return Decision::Allowed;
    };

    if let Some(required) = ctx.requires_clearance {
        if !has_clearance_level(user, required) {
            return Decision::Denied(DenialReason::InsufficientClearance { required });
        }
    }

    if let Some(tag) = required(ctx.requires_specialization.as_ref()) {
        if !has_specialization(user, tag) {
            return Decision::Denied(DenialReason::MissingSpecialization(tag.to_string()));
        }
    }

    if let Some(class) = required(ctx.data_classification.as_ref()) {
        if !has_data_classification_access(user, class) {
            return Decision::Denied(DenialReason::ClassificationDenied(class.to_string()));
        }
    }

    if let Some(project) = required(ctx.project_id.as_ref()) {
        if !has_project_access(user, project) {
            return Decision::Denied(DenialReason::ProjectDenied(project.to_string()));
        }
    }

    Decision::Allowed
}

/// An empty string imposes no requirement.
fn required(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|value| !value.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

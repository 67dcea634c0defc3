//! The access-control service.
//!
//! [`AccessControl`] is the single entry point for checks that start from
//! untyped names (CLI arguments, route tables, stored configuration). It
//! owns the audit logger and the [`InputPolicy`] that decides what an
//! unknown name means.

use cmlre_abac::{
    AbacError, Action, Decision, DenialReason, EvaluationContext, Module, User, evaluate_action,
    validate_permission,
};
use cmlre_audit::{AuditLogEntry, AuditLogger};
use cmlre_rbac::{Permission, RbacError, Role, has_permission};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// What to do with a permission, action or module name outside the known set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputPolicy {
    /// Unknown names are a caller bug and surface as [`AccessError`].
    Strict,
    /// Unknown names are denied with a reason naming the input.
    #[default]
    FailClosed,
}

impl InputPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            InputPolicy::Strict
        } else {
            InputPolicy::FailClosed
        }
    }
}

/// Malformed input under [`InputPolicy::Strict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Abac(#[from] AbacError),
}

pub type Result<T> = std::result::Result<T, AccessError>;

/// What a gate checks before rendering its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in user.
    None,
    Permission(Permission),
    Action(Action),
    /// A name that failed to resolve under [`InputPolicy::FailClosed`].
    /// Always denied with the carried reason.
    Unresolved(DenialReason),
}

impl Requirement {
    /// Name used as the audit resource.
    pub fn label(&self) -> String {
        match self {
            Requirement::None => "unknown".to_string(),
            Requirement::Permission(p) => p.as_str().to_string(),
            Requirement::Action(a) => a.as_str().to_string(),
            Requirement::Unresolved(
                DenialReason::UnknownPermission(name)
                | DenialReason::UnknownAction(name)
                | DenialReason::UnknownModule(name),
            ) => name.clone(),
            Requirement::Unresolved(_) => "unknown".to_string(),
        }
    }
}

/// Authorization entry point with audit logging.
#[derive(Debug, Default)]
pub struct AccessControl {
    audit: AuditLogger,
    policy: InputPolicy,
    log_evaluations: bool,
}

impl AccessControl {
    pub fn new(audit: AuditLogger, policy: InputPolicy) -> Self {
        Self {
            audit,
            policy,
            log_evaluations: false,
        }
    }

    /// Makes gates log every decision unless they say otherwise.
    pub fn with_evaluation_logging(mut self, enabled: bool) -> Self {
        self.log_evaluations = enabled;
        self
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn log_evaluations(&self) -> bool {
        self.log_evaluations
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Records a user action on the audit trail.
    pub fn log_user_action(
        &self,
        user: &User,
        action: &str,
        resource: &str,
        details: Option<Value>,
    ) -> AuditLogEntry {
        self.audit.log_user_action(user, action, resource, details)
    }

    // ------------------------------------------------------------------
    // Name resolution
    // ------------------------------------------------------------------

    /// Resolves a permission name into a gate requirement.
    pub fn permission_requirement(&self, name: &str) -> Result<Requirement> {
        match name.parse::<Permission>() {
            Ok(permission) => Ok(Requirement::Permission(permission)),
            Err(e) => self.unresolved(e.into(), DenialReason::UnknownPermission(name.to_string())),
        }
    }

    /// Resolves an action name into a gate requirement.
    pub fn action_requirement(&self, name: &str) -> Result<Requirement> {
        match name.parse::<Action>() {
            Ok(action) => Ok(Requirement::Action(action)),
            Err(e) => self.unresolved(e.into(), DenialReason::UnknownAction(name.to_string())),
        }
    }

    fn unresolved(&self, error: AccessError, reason: DenialReason) -> Result<Requirement> {
        match self.policy {
            InputPolicy::Strict => Err(error),
            InputPolicy::FailClosed => {
                debug!(%reason, "unresolved name denied");
                Ok(Requirement::Unresolved(reason))
            }
        }
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    /// Evaluates a typed permission.
    pub fn check(
        &self,
        user: Option<&User>,
        permission: Permission,
        context: Option<&EvaluationContext>,
    ) -> Decision {
        validate_permission(user, permission, context)
    }

    /// Evaluates a permission given by name.
    ///
    /// Under [`InputPolicy::FailClosed`] an absent user is reported before
    /// an unknown name.
    pub fn check_named(
        &self,
        user: Option<&User>,
        permission: &str,
        context: Option<&EvaluationContext>,
    ) -> Result<Decision> {
        let requirement = self.permission_requirement(permission)?;
        Ok(self.evaluate(user, &requirement, context))
    }

    /// Evaluates an action given by name.
    pub fn check_action_named(
        &self,
        user: &User,
        action: &str,
        context: Option<&EvaluationContext>,
    ) -> Result<Decision> {
        let requirement = self.action_requirement(action)?;
        Ok(self.evaluate(Some(user), &requirement, context))
    }

    /// Evaluates module access by name.
    pub fn check_module_named(&self, user: &User, module: &str) -> Result<Decision> {
        match module.parse::<Module>() {
            Ok(module) => {
                let permission = module.required_permission();
                Ok(validate_permission(Some(user), permission, None))
            }
            Err(e) => match self.policy {
                InputPolicy::Strict => Err(e.into()),
                InputPolicy::FailClosed => Ok(Decision::Denied(DenialReason::UnknownModule(
                    module.to_string(),
                ))),
            },
        }
    }

    /// Looks up one cell of the role table by name.
    pub fn role_has_permission_named(&self, role: &str, permission: &str) -> Result<bool> {
        let resolved = role
            .parse::<Role>()
            .and_then(|role| permission.parse::<Permission>().map(|p| (role, p)));
        match resolved {
            Ok((role, permission)) => Ok(has_permission(role, permission)),
            Err(e) => match self.policy {
                InputPolicy::Strict => Err(e.into()),
                InputPolicy::FailClosed => Ok(false),
            },
        }
    }

    /// Evaluates a resolved requirement.
    pub fn evaluate(
        &self,
        user: Option<&User>,
        requirement: &Requirement,
        context: Option<&EvaluationContext>,
    ) -> Decision {
        let Some(user) = user else {
            return Decision::Denied(DenialReason::NotAuthenticated);
        };
        match requirement {
            Requirement::None => Decision::Allowed,
            Requirement::Permission(permission) => {
                validate_permission(Some(user), *permission, context)
            }
            Requirement::Action(action) => evaluate_action(user, *action, context),
            Requirement::Unresolved(reason) => Decision::Denied(reason.clone()),
        }
    }
}

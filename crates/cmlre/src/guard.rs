//! Gates for presentation layers.
//!
//! A gate answers "may this be shown / used right now?" and produces the
//! user-facing text when it may not. Gates never render anything
//! themselves; callers map [`GateOutcome`] and [`ControlState`] onto their
//! own widgets.

use std::sync::atomic::{AtomicU32, Ordering};

use cmlre_abac::{Action, EvaluationContext, User, can_perform_action};
use cmlre_rbac::Role;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::access::{AccessControl, Requirement};

/// Shown when a gate is evaluated without a signed-in user.
pub const LOGIN_REQUIRED: &str = "Please log in to access this content.";

/// Emitted once repeated denials cross the escalation threshold.
pub const REPEATED_DENIAL_WARNING: &str =
    "Multiple access attempts detected. Please contact your administrator.";

/// Denials recorded before further denials escalate.
const ESCALATION_THRESHOLD: u32 = 2;

/// Text shown in place of gated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenialNotice {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Denials this gate has recorded, including this one.
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<String>,
}

impl DenialNotice {
    fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reason: None,
            attempts: 0,
            escalation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Render,
    Blocked(DenialNotice),
}

impl GateOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, GateOutcome::Render)
    }

    pub fn notice(&self) -> Option<&DenialNotice> {
        match self {
            GateOutcome::Render => None,
            GateOutcome::Blocked(notice) => Some(notice),
        }
    }
}

// ============================================================================
// Permission gate
// ============================================================================

/// Shows content when a permission or action check passes.
#[derive(Debug)]
pub struct PermissionGate {
    requirement: Requirement,
    context: Option<EvaluationContext>,
    fallback: Option<String>,
    show_reason: bool,
    log_access: Option<bool>,
    attempts: AtomicU32,
}

impl PermissionGate {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            context: None,
            fallback: None,
            show_reason: false,
            log_access: None,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Replaces the default "Access denied." message.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Appends the denial reason to the default message.
    pub fn show_reason(mut self, show: bool) -> Self {
        self.show_reason = show;
        self
    }

    /// Overrides the service-wide evaluation logging setting.
    pub fn log_access(mut self, enabled: bool) -> Self {
        self.log_access = Some(enabled);
        self
    }

    /// Denials recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn evaluate(&self, access: &AccessControl, user: Option<&User>) -> GateOutcome {
        let Some(user) = user else {
            return GateOutcome::Blocked(self.notice(Some(LOGIN_REQUIRED.to_string()), 0, None));
        };

        let (allowed, reason) = match &self.requirement {
            Requirement::Action(action) => {
                let allowed = can_perform_action(user, *action, self.context.as_ref());
                let reason = (!allowed)
                    .then(|| format!("Action '{action}' not permitted for role '{}'", user.role));
                (allowed, reason)
            }
            requirement => {
                let decision = access.evaluate(Some(user), requirement, self.context.as_ref());
                (decision.is_allowed(), decision.reason().map(ToString::to_string))
            }
        };

        let resource = self.requirement.label();
        if allowed {
            info!(user_id = %user.id, %resource, "access granted");
        } else {
            warn!(
                user_id = %user.id,
                %resource,
                reason = reason.as_deref().unwrap_or(""),
                "access denied"
            );
        }

        let mut attempts = self.attempts();
        let mut escalation = None;
        if self.log_access.unwrap_or(access.log_evaluations()) {
            let action = if allowed { "access_granted" } else { "access_denied" };
            access.log_user_action(user, action, &resource, Some(self.details(reason.as_deref())));

            if !allowed {
                let prior = self.attempts.fetch_add(1, Ordering::Relaxed);
                attempts = prior + 1;
                if prior > ESCALATION_THRESHOLD {
                    warn!(user_id = %user.id, %resource, attempts, "{REPEATED_DENIAL_WARNING}");
                    escalation = Some(REPEATED_DENIAL_WARNING.to_string());
                }
            }
        }

        if allowed {
            GateOutcome::Render
        } else {
            GateOutcome::Blocked(self.notice(reason, attempts, escalation))
        }
    }

    fn details(&self, reason: Option<&str>) -> Value {
        let mut details = json!({ "context": self.context });
        if let (Some(reason), Value::Object(map)) = (reason, &mut details) {
            map.insert("reason".to_string(), Value::String(reason.to_string()));
        }
        details
    }

    fn notice(
        &self,
        reason: Option<String>,
        attempts: u32,
        escalation: Option<String>,
    ) -> DenialNotice {
        let message = match &self.fallback {
            Some(fallback) => fallback.clone(),
            None => {
                let mut message = "Access denied.".to_string();
                if let (true, Some(reason)) = (self.show_reason, reason.as_deref()) {
                    if !reason.is_empty() {
                        message.push_str(&format!(" Reason: {reason}"));
                    }
                }
                if attempts > 1 {
                    message.push_str(&format!(
                        "\nMultiple attempts detected ({attempts}). \
                         Contact administrator if you believe this is an error."
                    ));
                }
                message
            }
        };

        DenialNotice {
            message,
            reason,
            attempts,
            escalation,
        }
    }
}

// ============================================================================
// Role gate
// ============================================================================

/// Shows content only to the listed roles.
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Vec<Role>,
    fallback: Option<String>,
}

impl RoleGate {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn evaluate(&self, user: Option<&User>) -> GateOutcome {
        if user.is_some_and(|u| self.allowed.contains(&u.role)) {
            return GateOutcome::Render;
        }

        let message = self.fallback.clone().unwrap_or_else(|| {
            let roles: Vec<&str> = self.allowed.iter().map(Role::as_str).collect();
            format!("This content is restricted to: {}", roles.join(", "))
        });
        GateOutcome::Blocked(DenialNotice::plain(message))
    }
}

// ============================================================================
// Action gate
// ============================================================================

/// How an action control should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlState {
    /// No signed-in user; the control is not shown.
    Hidden,
    Enabled,
    /// Shown but inert. The tooltip is set when the user lacks the right.
    Disabled { tooltip: Option<String> },
}

/// Result of activating an action control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T> {
    /// The handler ran.
    Performed(T),
    /// The user may not perform the action; the handler did not run.
    Denied(DenialNotice),
    /// Hidden or externally disabled; nothing happened.
    Ignored,
}

/// Wraps an interactive control guarded by a named action.
#[derive(Debug, Clone)]
pub struct ActionGate {
    requirement: Requirement,
    context: Option<EvaluationContext>,
    disabled: bool,
}

impl ActionGate {
    pub fn new(action: Action) -> Self {
        Self::from_requirement(Requirement::Action(action))
    }

    /// Builds a gate from a resolved name. Anything but an action
    /// requirement is never permitted.
    pub fn from_requirement(requirement: Requirement) -> Self {
        Self {
            requirement,
            context: None,
            disabled: false,
        }
    }

    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Disables the control regardless of permissions.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn permitted(&self, user: &User) -> bool {
        match &self.requirement {
            Requirement::Action(action) => can_perform_action(user, *action, self.context.as_ref()),
            _ => false,
        }
    }

    pub fn state(&self, user: Option<&User>) -> ControlState {
        let Some(user) = user else {
            return ControlState::Hidden;
        };
        if !self.permitted(user) {
            return ControlState::Disabled {
                tooltip: Some(format!("Action '{}' not permitted", self.requirement.label())),
            };
        }
        if self.disabled {
            ControlState::Disabled { tooltip: None }
        } else {
            ControlState::Enabled
        }
    }

    /// Runs `handler` if the user may perform the action, logging the
    /// invocation. Otherwise returns the denial notice.
    pub fn invoke<T>(
        &self,
        access: &AccessControl,
        user: Option<&User>,
        handler: impl FnOnce() -> T,
    ) -> ActionOutcome<T> {
        let Some(user) = user else {
            return ActionOutcome::Ignored;
        };
        let action = self.requirement.label();

        if !self.permitted(user) {
            warn!(user_id = %user.id, %action, "action blocked");
            return ActionOutcome::Denied(DenialNotice::plain(format!(
                "Action '{action}' not permitted for your role"
            )));
        }
        if self.disabled {
            return ActionOutcome::Ignored;
        }

        let details = self.context.as_ref().map(|ctx| json!(ctx));
        access.log_user_action(user, &action, "button_click", details);
        ActionOutcome::Performed(handler())
    }
}

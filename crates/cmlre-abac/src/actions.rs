//! Named actions and their dispatch rules.
//!
//! | Action                   | Rule |
//! |--------------------------|------|
//! | `upload_data`            | canUploadData ∧ clearance ≥ standard |
//! | `create_survey`          | canCreateSurveys |
//! | `modify_survey`          | owner is user ? canModifyOwnSurveys : canModifyOthersSurveys |
//! | `delete_data`            | canDeleteData ∧ clearance ≥ advanced |
//! | `access_restricted_data` | canAccessRestrictedData ∧ clearance ≥ restricted |
//! | `manage_users`           | canManageUsers |
//! | `configure_system`       | canConfigureSystem |

use std::fmt::{self, Display};
use std::str::FromStr;

use cmlre_rbac::{Permission, has_permission};
use serde::{Deserialize, Serialize};

use crate::attributes::{ClearanceLevel, User};
use crate::context::EvaluationContext;
use crate::error::AbacError;
use crate::evaluator::{Decision, DenialReason, has_clearance_level};

/// A user-initiated operation with a fixed authorization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    UploadData,
    CreateSurvey,
    ModifySurvey,
    DeleteData,
    AccessRestrictedData,
    ManageUsers,
    ConfigureSystem,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::UploadData,
        Action::CreateSurvey,
        Action::ModifySurvey,
        Action::DeleteData,
        Action::AccessRestrictedData,
        Action::ManageUsers,
        Action::ConfigureSystem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UploadData => "upload_data",
            Action::CreateSurvey => "create_survey",
            Action::ModifySurvey => "modify_survey",
            Action::DeleteData => "delete_data",
            Action::AccessRestrictedData => "access_restricted_data",
            Action::ManageUsers => "manage_users",
            Action::ConfigureSystem => "configure_system",
        }
    }

    /// Minimum clearance the action demands on top of its permission.
    pub fn required_clearance(&self) -> Option<ClearanceLevel> {
        match self {
            Action::UploadData => Some(ClearanceLevel::Standard),
            Action::DeleteData => Some(ClearanceLevel::Advanced),
            Action::AccessRestrictedData => Some(ClearanceLevel::Restricted),
            _ => None,
        }
    }

    /// The permission the action requires for this user and context.
    ///
    /// Only `modify_survey` depends on the context: the own-survey flag
    /// applies when `context.owner_id` equals the user's id, the
    /// others-survey flag otherwise (including when no owner is given).
    pub fn required_permission(
        &self,
        user: &User,
        context: Option<&EvaluationContext>,
    ) -> Permission {
        match self {
            Action::UploadData => Permission::UploadData,
            Action::CreateSurvey => Permission::CreateSurveys,
            Action::ModifySurvey => {
                let owns = context
                    .and_then(|ctx| ctx.owner_id.as_ref())
                    .is_some_and(|owner| *owner == user.id);
                if owns {
                    Permission::ModifyOwnSurveys
                } else {
                    Permission::ModifyOthersSurveys
                }
            }
            Action::DeleteData => Permission::DeleteData,
            Action::AccessRestrictedData => Permission::AccessRestrictedData,
            Action::ManageUsers => Permission::ManageUsers,
            Action::ConfigureSystem => Permission::ConfigureSystem,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AbacError::UnknownAction(s.to_string()))
    }
}

/// Evaluates an action, reporting the first rule that fails.
pub fn evaluate_action(
    user: &User,
    action: Action,
    context: Option<&EvaluationContext>,
) -> Decision {
    let permission = action.required_permission(user, context);
    if !has_permission(user.role, permission) {
        return Decision::Denied(DenialReason::MissingPermission {
            role: user.role,
            permission,
        });
    }

    if let Some(required) = action.required_clearance() {
        if !has_clearance_level(user, required) {
            return Decision::Denied(DenialReason::InsufficientClearance { required });
        }
    }

    Decision::Allowed
}

/// Returns whether the user may perform `action`.
pub fn can_perform_action(
    user: &User,
    action: Action,
    context: Option<&EvaluationContext>,
) -> bool {
    evaluate_action(user, action, context).is_allowed()
}

/// Name-based variant; an unknown action name is denied.
pub fn can_perform_action_named(
    user: &User,
    action: &str,
    context: Option<&EvaluationContext>,
) -> bool {
    action
        .parse::<Action>()
        .is_ok_and(|a| can_perform_action(user, a, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmlre_rbac::Role;
    use test_case::test_case;

    fn user(role: Role, clearance: ClearanceLevel) -> User {
        User::new("1", "Test", "test@cmlre.gov.in", role).with_clearance(clearance)
    }

    #[test]
    fn test_modify_survey_own_branch() {
        let scientist = user(Role::Scientist, ClearanceLevel::Basic);
        let ctx = EvaluationContext::new().with_owner("1");

        assert_eq!(
            Action::ModifySurvey.required_permission(&scientist, Some(&ctx)),
            Permission::ModifyOwnSurveys
        );
        assert!(can_perform_action(&scientist, Action::ModifySurvey, Some(&ctx)));
    }

    #[test]
    fn test_modify_survey_others_branch() {
        let scientist = user(Role::Scientist, ClearanceLevel::Restricted);
        let ctx = EvaluationContext::new().with_owner("99");

        assert_eq!(
            Action::ModifySurvey.required_permission(&scientist, Some(&ctx)),
            Permission::ModifyOthersSurveys
        );
        assert!(!can_perform_action(&scientist, Action::ModifySurvey, Some(&ctx)));

        let admin = user(Role::Admin, ClearanceLevel::Basic);
        assert!(can_perform_action(&admin, Action::ModifySurvey, Some(&ctx)));
    }

    #[test]
    fn test_modify_survey_without_owner_uses_others_flag() {
        let scientist = user(Role::Scientist, ClearanceLevel::Advanced);
        assert!(!can_perform_action(&scientist, Action::ModifySurvey, None));
    }

    #[test]
    fn test_policymaker_cannot_manage_users() {
        let policymaker = user(Role::Policymaker, ClearanceLevel::Standard);
        assert!(!can_perform_action(&policymaker, Action::ManageUsers, None));
        assert!(!can_perform_action_named(&policymaker, "manage_users", None));
    }

    #[test_case(ClearanceLevel::Basic, false; "basic")]
    #[test_case(ClearanceLevel::Standard, true; "standard")]
    #[test_case(ClearanceLevel::Advanced, true; "advanced")]
    fn test_upload_requires_standard_clearance(clearance: ClearanceLevel, expected: bool) {
        let scientist = user(Role::Scientist, clearance);
        assert_eq!(can_perform_action(&scientist, Action::UploadData, None), expected);
    }

    #[test]
    fn test_delete_requires_advanced_clearance() {
        let scientist = user(Role::Scientist, ClearanceLevel::Standard);
        assert_eq!(
            evaluate_action(&scientist, Action::DeleteData, None),
            Decision::Denied(DenialReason::InsufficientClearance {
                required: ClearanceLevel::Advanced
            })
        );
    }

    #[test]
    fn test_restricted_data_needs_restricted_clearance_even_for_admin() {
        let admin = user(Role::Admin, ClearanceLevel::Advanced);
        assert!(!can_perform_action(&admin, Action::AccessRestrictedData, None));

        let admin = user(Role::Admin, ClearanceLevel::Restricted);
        assert!(can_perform_action(&admin, Action::AccessRestrictedData, None));
    }

    #[test]
    fn test_permission_checked_before_clearance() {
        let conservationist = user(Role::Conservationist, ClearanceLevel::Basic);
        assert!(matches!(
            evaluate_action(&conservationist, Action::UploadData, None),
            Decision::Denied(DenialReason::MissingPermission {
                permission: Permission::UploadData,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_action_fails_closed() {
        let admin = user(Role::Admin, ClearanceLevel::Restricted);
        assert!(!can_perform_action_named(&admin, "launch_rov", None));
        assert_eq!(
            "launch_rov".parse::<Action>(),
            Err(AbacError::UnknownAction("launch_rov".to_string()))
        );
    }
}

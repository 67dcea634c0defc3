//! Role-permission lookup.
//!
//! [`has_permission`] is the typed lookup used inside the workspace.
//! [`get_flag`] is the string boundary for callers holding raw names
//! (request parameters, CLI arguments, stored sessions); unknown names are
//! rejected with a typed error instead of degrading to `false`.

use thiserror::Error;

use crate::permissions::Permission;
use crate::roles::Role;

/// Error type for malformed role-table inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// The role name is not one of the closed role set.
    #[error("Unknown role: '{0}'")]
    UnknownRole(String),

    /// The permission name is not one of the closed flag set.
    #[error("Unknown permission: '{0}'")]
    UnknownPermission(String),
}

/// Result type for role-table operations.
pub type Result<T> = std::result::Result<T, RbacError>;

/// Returns whether `role` holds `permission`.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    role.flags().get(permission)
}

/// Looks up a flag by role and permission name.
///
/// # Errors
///
/// [`RbacError::UnknownRole`] or [`RbacError::UnknownPermission`] when
/// either name is outside its closed set. The role is checked first.
pub fn get_flag(role: &str, permission: &str) -> Result<bool> {
    let role: Role = role.parse()?;
    let permission: Permission = permission.parse()?;
    Ok(has_permission(role, permission))
}

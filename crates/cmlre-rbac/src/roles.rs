//! Role definitions.
//!
//! Four closed roles. A user's role is fixed for the lifetime of a session.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, PermissionFlags};
use crate::table::RbacError;

/// Role assigned to a platform user.
///
/// Serializes lowercase. Parsing, from text or JSON, ignores letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    /// Field and lab researchers.
    ///
    /// **Use Cases:**
    /// - Uploading oceanographic, taxonomic and molecular survey data
    /// - Approving datasets from their own projects
    Scientist,

    /// Conservation planners working from curated data.
    ///
    /// Read-mostly: may create and maintain their own surveys but cannot
    /// edit, upload or delete datasets.
    Conservationist,

    /// Policy and planning staff.
    ///
    /// Consumes reports and oceanographic summaries; no write access.
    Policymaker,

    /// Platform administrator. Holds every capability.
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Scientist,
        Role::Conservationist,
        Role::Policymaker,
        Role::Admin,
    ];

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Scientist => "scientist",
            Role::Conservationist => "conservationist",
            Role::Policymaker => "policymaker",
            Role::Admin => "admin",
        }
    }

    /// Returns a human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Scientist => "Scientist",
            Role::Conservationist => "Conservationist",
            Role::Policymaker => "Policymaker",
            Role::Admin => "Administrator",
        }
    }

    /// Returns the complete permission record for this role.
    pub fn flags(&self) -> &'static PermissionFlags {
        match self {
            Role::Scientist => &PermissionFlags::SCIENTIST,
            Role::Conservationist => &PermissionFlags::CONSERVATIONIST,
            Role::Policymaker => &PermissionFlags::POLICYMAKER,
            Role::Admin => &PermissionFlags::ADMIN,
        }
    }

    /// Returns whether this role holds the given permission.
    pub fn has(&self, permission: Permission) -> bool {
        self.flags().get(permission)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = RbacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RbacError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_json_follows_parse_rules() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::from_str::<Role>("\"Admin\"").unwrap(), Role::Admin);
        assert_eq!(
            serde_json::from_str::<Role>("\"POLICYMAKER\"").unwrap(),
            Role::Policymaker
        );
        assert!(serde_json::from_str::<Role>("\"captain\"").is_err());
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("POLICYMAKER".parse::<Role>().unwrap(), Role::Policymaker);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "captain".parse::<Role>().unwrap_err();
        assert!(matches!(err, RbacError::UnknownRole(ref name) if name == "captain"));
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Conservationist).unwrap();
        assert_eq!(json, "\"conservationist\"");

        let role: Role = serde_json::from_str("\"scientist\"").unwrap();
        assert_eq!(role, Role::Scientist);
    }

    #[test]
    fn test_has_delegates_to_flags() {
        assert!(Role::Scientist.has(Permission::UploadData));
        assert!(!Role::Policymaker.has(Permission::UploadData));
    }
}

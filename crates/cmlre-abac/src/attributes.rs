//! User record and the attributes contextual checks consume.
//!
//! - **Identity**: id, display name, email, role
//! - **Clearance**: one ordinal [`ClearanceLevel`] (defaults to `basic`)
//! - **Tags**: specializations, project access, data classifications
//!
//! Tag lists have set semantics; an absent list behaves like an empty one.
//! The serialized shape matches the stored session record (camelCase keys,
//! optional lists omitted when empty).

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use cmlre_rbac::Role;
use serde::{Deserialize, Serialize};

use crate::error::AbacError;

// ============================================================================
// User ID
// ============================================================================

/// Opaque identifier of a platform user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Clearance Level
// ============================================================================

/// Security clearance, ordered `Basic < Standard < Advanced < Restricted`.
///
/// Serializes lowercase. Parsing, from text or JSON, ignores letter case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ClearanceLevel {
    #[default]
    Basic,
    Standard,
    Advanced,
    Restricted,
}

impl ClearanceLevel {
    /// All levels, lowest first.
    pub const ALL: [ClearanceLevel; 4] = [
        ClearanceLevel::Basic,
        ClearanceLevel::Standard,
        ClearanceLevel::Advanced,
        ClearanceLevel::Restricted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearanceLevel::Basic => "basic",
            ClearanceLevel::Standard => "standard",
            ClearanceLevel::Advanced => "advanced",
            ClearanceLevel::Restricted => "restricted",
        }
    }

    /// Returns the ordinal position (0 = basic).
    pub fn ordinal(&self) -> u8 {
        match self {
            ClearanceLevel::Basic => 0,
            ClearanceLevel::Standard => 1,
            ClearanceLevel::Advanced => 2,
            ClearanceLevel::Restricted => 3,
        }
    }
}

impl Display for ClearanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ClearanceLevel {
    type Error = AbacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ClearanceLevel {
    type Err = AbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClearanceLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AbacError::UnknownClearance(s.to_string()))
    }
}

// ============================================================================
// User
// ============================================================================

/// An authenticated platform user.
///
/// Immutable for the duration of a session; permission checks only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance_level: Option<ClearanceLevel>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub specializations: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub project_access: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub data_classifications: BTreeSet<String>,
}

impl User {
    /// Creates a user with no optional attributes.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            department: None,
            avatar: None,
            clearance_level: None,
            specializations: BTreeSet::new(),
            project_access: BTreeSet::new(),
            data_classifications: BTreeSet::new(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_clearance(mut self, level: ClearanceLevel) -> Self {
        self.clearance_level = Some(level);
        self
    }

    pub fn with_specializations<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specializations.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_access
            .extend(projects.into_iter().map(Into::into));
        self
    }

    pub fn with_data_classifications<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_classifications
            .extend(classes.into_iter().map(Into::into));
        self
    }

    /// Returns the clearance level, treating an unset level as `basic`.
    pub fn effective_clearance(&self) -> ClearanceLevel {
        self.clearance_level.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearance_json_follows_parse_rules() {
        let level: ClearanceLevel = serde_json::from_str("\"Advanced\"").unwrap();
        assert_eq!(level, ClearanceLevel::Advanced);
        assert_eq!("ADVANCED".parse::<ClearanceLevel>().unwrap(), level);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"advanced\"");
        assert!(serde_json::from_str::<ClearanceLevel>("\"top-secret\"").is_err());

        let user: User = serde_json::from_str(
            r#"{"id": "9", "name": "N", "email": "n@cmlre.gov.in",
                "role": "Admin", "clearanceLevel": "Restricted"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.clearance_level, Some(ClearanceLevel::Restricted));
    }

    #[test]
    fn test_clearance_ordering() {
        assert!(ClearanceLevel::Basic < ClearanceLevel::Standard);
        assert!(ClearanceLevel::Standard < ClearanceLevel::Advanced);
        assert!(ClearanceLevel::Advanced < ClearanceLevel::Restricted);

        for pair in ClearanceLevel::ALL.windows(2) {
            assert!(pair[0].ordinal() < pair[1].ordinal());
        }
    }

    #[test]
    fn test_clearance_parse() {
        assert_eq!(
            "advanced".parse::<ClearanceLevel>().unwrap(),
            ClearanceLevel::Advanced
        );
        assert_eq!(
            "elevated".parse::<ClearanceLevel>(),
            Err(AbacError::UnknownClearance("elevated".to_string()))
        );
    }

    #[test]
    fn test_unset_clearance_is_basic() {
        let user = User::new("9", "Guest", "guest@cmlre.gov.in", Role::Policymaker);
        assert_eq!(user.clearance_level, None);
        assert_eq!(user.effective_clearance(), ClearanceLevel::Basic);
    }

    #[test]
    fn test_user_builder() {
        let user = User::new("1", "Aman Antil", "aman.antil@cmlre.gov.in", Role::Scientist)
            .with_department("Marine Biology")
            .with_clearance(ClearanceLevel::Advanced)
            .with_specializations(["Oceanography", "Oceanography", "Data Analysis"])
            .with_projects(["OS-2024-001"])
            .with_data_classifications(["public", "internal"]);

        assert_eq!(user.department.as_deref(), Some("Marine Biology"));
        assert_eq!(user.specializations.len(), 2, "set semantics");
        assert!(user.project_access.contains("OS-2024-001"));
        assert!(user.data_classifications.contains("internal"));
    }

    #[test]
    fn test_user_deserializes_session_record() {
        let json = r#"{
            "id": "2",
            "name": "Yogesh",
            "email": "yogesh@cmlre.gov.in",
            "role": "conservationist",
            "department": "Marine Conservation",
            "clearanceLevel": "standard",
            "specializations": ["Conservation", "Ecosystem Management"],
            "projectAccess": ["OS-2024-001", "DS-2024-002"]
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId::from("2"));
        assert_eq!(user.role, Role::Conservationist);
        assert_eq!(user.clearance_level, Some(ClearanceLevel::Standard));
        assert!(user.data_classifications.is_empty(), "absent list is empty");
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User::new("3", "Yash", "yash@cmlre.gov.in", Role::Policymaker)
            .with_clearance(ClearanceLevel::Standard)
            .with_projects(["OS-2024-001"]);

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["clearanceLevel"], "standard");
        assert_eq!(value["projectAccess"][0], "OS-2024-001");
        assert!(value.get("dataClassifications").is_none());
    }
}

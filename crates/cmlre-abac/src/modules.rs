//! Research module access.
//!
//! Each gated workspace module maps to exactly one role permission.

use std::fmt::{self, Display};
use std::str::FromStr;

use cmlre_rbac::{Permission, has_permission};
use serde::{Deserialize, Serialize};

use crate::attributes::User;
use crate::error::AbacError;

/// A permission-gated workspace module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Oceanography,
    Taxonomy,
    Molecular,
    Data,
}

impl Module {
    /// All modules, in navigation order.
    pub const ALL: [Module; 4] = [
        Module::Oceanography,
        Module::Taxonomy,
        Module::Molecular,
        Module::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Oceanography => "oceanography",
            Module::Taxonomy => "taxonomy",
            Module::Molecular => "molecular",
            Module::Data => "data",
        }
    }

    /// The permission that unlocks this module.
    pub fn required_permission(&self) -> Permission {
        match self {
            Module::Oceanography => Permission::AccessOceanography,
            Module::Taxonomy => Permission::AccessTaxonomy,
            Module::Molecular => Permission::AccessMolecular,
            Module::Data => Permission::ViewData,
        }
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = AbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AbacError::UnknownModule(s.to_string()))
    }
}

/// Returns whether the user's role unlocks `module`.
pub fn can_access_module(user: &User, module: Module) -> bool {
    has_permission(user.role, module.required_permission())
}

/// Name-based variant; an unknown module name is denied.
pub fn can_access_module_named(user: &User, module: &str) -> bool {
    module
        .parse::<Module>()
        .is_ok_and(|m| can_access_module(user, m))
}

/// Returns the modules the user may open, in navigation order.
pub fn accessible_modules(user: &User) -> Vec<Module> {
    Module::ALL
        .into_iter()
        .filter(|m| can_access_module(user, *m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::Module::{Data, Molecular, Oceanography, Taxonomy};
    use cmlre_rbac::Role;
    use test_case::test_case;

    fn user(role: Role) -> User {
        User::new("1", "Test", "test@cmlre.gov.in", role)
    }

    #[test_case(Role::Scientist, &[Oceanography, Taxonomy, Molecular, Data]; "scientist")]
    #[test_case(Role::Conservationist, &[Oceanography, Taxonomy, Data]; "conservationist")]
    #[test_case(Role::Policymaker, &[Oceanography, Data]; "policymaker")]
    #[test_case(Role::Admin, &Module::ALL; "admin")]
    fn test_accessible_modules(role: Role, expected: &[Module]) {
        assert_eq!(accessible_modules(&user(role)), expected);
    }

    #[test]
    fn test_unknown_module_is_denied() {
        let admin = user(Role::Admin);
        assert!(!can_access_module_named(&admin, "settings"));
        assert!(!can_access_module_named(&admin, "Oceanography"));
        assert!(can_access_module_named(&admin, "oceanography"));
    }

    #[test]
    fn test_module_permission_mapping() {
        assert_eq!(Module::Data.required_permission(), Permission::ViewData);
        assert_eq!(
            Module::Molecular.required_permission(),
            Permission::AccessMolecular
        );
    }
}

//! Access summary for a signed-in user.

use std::collections::BTreeSet;

use cmlre_abac::{ClearanceLevel, User};
use cmlre_rbac::{Permission, Role, has_permission};
use serde::Serialize;

/// Capabilities listed on the access panel, in display order.
pub const DISPLAYED_PERMISSIONS: [Permission; 9] = [
    Permission::ViewData,
    Permission::EditData,
    Permission::UploadData,
    Permission::CreateSurveys,
    Permission::CreateReports,
    Permission::ManageUsers,
    Permission::AccessOceanography,
    Permission::AccessTaxonomy,
    Permission::AccessMolecular,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub permission: Permission,
    pub label: &'static str,
    pub granted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessProfile {
    pub role: Role,
    pub department: Option<String>,
    pub clearance: ClearanceLevel,
    pub capabilities: Vec<Capability>,
    pub granted: usize,
    pub security_score: u32,
    pub specializations: BTreeSet<String>,
    pub project_access: BTreeSet<String>,
    pub data_classifications: BTreeSet<String>,
}

impl AccessProfile {
    pub fn for_user(user: &User) -> Self {
        let capabilities: Vec<Capability> = DISPLAYED_PERMISSIONS
            .into_iter()
            .map(|permission| Capability {
                permission,
                label: permission.label(),
                granted: has_permission(user.role, permission),
            })
            .collect();
        let granted = capabilities.iter().filter(|c| c.granted).count();

        Self {
            role: user.role,
            department: user.department.clone(),
            clearance: user.effective_clearance(),
            security_score: security_score(granted, capabilities.len(), user.clearance_level),
            capabilities,
            granted,
            specializations: user.specializations.clone(),
            project_access: user.project_access.clone(),
            data_classifications: user.data_classifications.clone(),
        }
    }

    pub fn total(&self) -> usize {
        self.capabilities.len()
    }
}

/// Percentage of displayed capabilities granted, weighted by clearance and
/// capped at 100.
///
/// Only an explicitly assigned clearance adjusts the score: `basic` scales
/// by 0.8, `restricted` by 1.2. An unset clearance is not weighted.
pub fn security_score(granted: usize, total: usize, clearance: Option<ClearanceLevel>) -> u32 {
    if total == 0 {
        return 0;
    }
    let base = (granted as f64 / total as f64 * 100.0).round();
    let multiplier = match clearance {
        Some(ClearanceLevel::Basic) => 0.8,
        Some(ClearanceLevel::Restricted) => 1.2,
        _ => 1.0,
    };
    ((base * multiplier).round() as u32).min(100)
}

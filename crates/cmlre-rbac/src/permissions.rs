//! Permission flags and the per-role permission records.
//!
//! A [`Permission`] names one capability. A [`PermissionFlags`] record holds
//! an explicit boolean for every capability; each role owns exactly one.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::table::RbacError;

/// Capability that a role may hold.
///
/// The canonical name is the camelCase flag name (`canEditData`); the
/// kebab-case spelling (`can-edit-data`) is accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Permission {
    ViewData,
    EditData,
    ExportData,
    ViewReports,
    CreateReports,
    /// Create, disable and re-role platform accounts.
    ManageUsers,
    AccessTaxonomy,
    AccessMolecular,
    AccessOceanography,
    UploadData,
    CreateSurveys,
    /// Modify surveys the user owns.
    ModifyOwnSurveys,
    /// Modify surveys owned by someone else.
    ModifyOthersSurveys,
    DeleteData,
    /// Read datasets classified above `internal`.
    AccessRestrictedData,
    ManageProjects,
    ApproveData,
    ConfigureSystem,
    ViewAuditLogs,
    ManageIntegrations,
}

impl Permission {
    /// Every permission, in table order.
    pub const ALL: [Permission; 20] = [
        Permission::ViewData,
        Permission::EditData,
        Permission::ExportData,
        Permission::ViewReports,
        Permission::CreateReports,
        Permission::ManageUsers,
        Permission::AccessTaxonomy,
        Permission::AccessMolecular,
        Permission::AccessOceanography,
        Permission::UploadData,
        Permission::CreateSurveys,
        Permission::ModifyOwnSurveys,
        Permission::ModifyOthersSurveys,
        Permission::DeleteData,
        Permission::AccessRestrictedData,
        Permission::ManageProjects,
        Permission::ApproveData,
        Permission::ConfigureSystem,
        Permission::ViewAuditLogs,
        Permission::ManageIntegrations,
    ];

    /// Returns the canonical flag name (e.g. `canEditData`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewData => "canViewData",
            Permission::EditData => "canEditData",
            Permission::ExportData => "canExportData",
            Permission::ViewReports => "canViewReports",
            Permission::CreateReports => "canCreateReports",
            Permission::ManageUsers => "canManageUsers",
            Permission::AccessTaxonomy => "canAccessTaxonomy",
            Permission::AccessMolecular => "canAccessMolecular",
            Permission::AccessOceanography => "canAccessOceanography",
            Permission::UploadData => "canUploadData",
            Permission::CreateSurveys => "canCreateSurveys",
            Permission::ModifyOwnSurveys => "canModifyOwnSurveys",
            Permission::ModifyOthersSurveys => "canModifyOthersSurveys",
            Permission::DeleteData => "canDeleteData",
            Permission::AccessRestrictedData => "canAccessRestrictedData",
            Permission::ManageProjects => "canManageProjects",
            Permission::ApproveData => "canApproveData",
            Permission::ConfigureSystem => "canConfigureSystem",
            Permission::ViewAuditLogs => "canViewAuditLogs",
            Permission::ManageIntegrations => "canManageIntegrations",
        }
    }

    /// Returns a short label for tables and panels.
    pub fn label(&self) -> &'static str {
        match self {
            Permission::ViewData => "View Data",
            Permission::EditData => "Edit Data",
            Permission::ExportData => "Export Data",
            Permission::ViewReports => "View Reports",
            Permission::CreateReports => "Create Reports",
            Permission::ManageUsers => "Manage Users",
            Permission::AccessTaxonomy => "Access Taxonomy",
            Permission::AccessMolecular => "Access Molecular",
            Permission::AccessOceanography => "Access Oceanography",
            Permission::UploadData => "Upload Data",
            Permission::CreateSurveys => "Create Surveys",
            Permission::ModifyOwnSurveys => "Modify Own Surveys",
            Permission::ModifyOthersSurveys => "Modify Others' Surveys",
            Permission::DeleteData => "Delete Data",
            Permission::AccessRestrictedData => "Access Restricted Data",
            Permission::ManageProjects => "Manage Projects",
            Permission::ApproveData => "Approve Data",
            Permission::ConfigureSystem => "Configure System",
            Permission::ViewAuditLogs => "View Audit Logs",
            Permission::ManageIntegrations => "Manage Integrations",
        }
    }

    /// Returns the kebab-case spelling (e.g. `can-edit-data`).
    pub fn kebab_name(&self) -> String {
        let mut out = String::with_capacity(self.as_str().len() + 4);
        for ch in self.as_str().chars() {
            if ch.is_ascii_uppercase() {
                out.push('-');
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.kebab_name() == s)
            .ok_or_else(|| RbacError::UnknownPermission(s.to_string()))
    }
}

impl From<Permission> for &'static str {
    fn from(permission: Permission) -> Self {
        permission.as_str()
    }
}

impl TryFrom<String> for Permission {
    type Error = RbacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Complete permission record for one role.
///
/// Every field must be set explicitly; there are no sparse records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    pub can_view_data: bool,
    pub can_edit_data: bool,
    pub can_export_data: bool,
    pub can_view_reports: bool,
    pub can_create_reports: bool,
    pub can_manage_users: bool,
    pub can_access_taxonomy: bool,
    pub can_access_molecular: bool,
    pub can_access_oceanography: bool,
    pub can_upload_data: bool,
    pub can_create_surveys: bool,
    pub can_modify_own_surveys: bool,
    pub can_modify_others_surveys: bool,
    pub can_delete_data: bool,
    pub can_access_restricted_data: bool,
    pub can_manage_projects: bool,
    pub can_approve_data: bool,
    pub can_configure_system: bool,
    pub can_view_audit_logs: bool,
    pub can_manage_integrations: bool,
}

impl PermissionFlags {
    pub const SCIENTIST: PermissionFlags = PermissionFlags {
        can_view_data: true,
        can_edit_data: true,
        can_export_data: true,
        can_view_reports: true,
        can_create_reports: true,
        can_manage_users: false,
        can_access_taxonomy: true,
        can_access_molecular: true,
        can_access_oceanography: true,
        can_upload_data: true,
        can_create_surveys: true,
        can_modify_own_surveys: true,
        can_modify_others_surveys: false,
        can_delete_data: true,
        can_access_restricted_data: true,
        can_manage_projects: true,
        can_approve_data: true,
        can_configure_system: false,
        can_view_audit_logs: false,
        can_manage_integrations: false,
    };

    pub const CONSERVATIONIST: PermissionFlags = PermissionFlags {
        can_view_data: true,
        can_edit_data: false,
        can_export_data: true,
        can_view_reports: true,
        can_create_reports: true,
        can_manage_users: false,
        can_access_taxonomy: true,
        can_access_molecular: false,
        can_access_oceanography: true,
        can_upload_data: false,
        can_create_surveys: true,
        can_modify_own_surveys: true,
        can_modify_others_surveys: false,
        can_delete_data: false,
        can_access_restricted_data: false,
        can_manage_projects: false,
        can_approve_data: false,
        can_configure_system: false,
        can_view_audit_logs: false,
        can_manage_integrations: false,
    };

    pub const POLICYMAKER: PermissionFlags = PermissionFlags {
        can_view_data: true,
        can_edit_data: false,
        can_export_data: true,
        can_view_reports: true,
        can_create_reports: false,
        can_manage_users: false,
        can_access_taxonomy: false,
        can_access_molecular: false,
        can_access_oceanography: true,
        can_upload_data: false,
        can_create_surveys: false,
        can_modify_own_surveys: false,
        can_modify_others_surveys: false,
        can_delete_data: false,
        can_access_restricted_data: false,
        can_manage_projects: false,
        can_approve_data: false,
        can_configure_system: false,
        can_view_audit_logs: false,
        can_manage_integrations: false,
    };

    pub const ADMIN: PermissionFlags = PermissionFlags {
        can_view_data: true,
        can_edit_data: true,
        can_export_data: true,
        can_view_reports: true,
        can_create_reports: true,
        can_manage_users: true,
        can_access_taxonomy: true,
        can_access_molecular: true,
        can_access_oceanography: true,
        can_upload_data: true,
        can_create_surveys: true,
        can_modify_own_surveys: true,
        can_modify_others_surveys: true,
        can_delete_data: true,
        can_access_restricted_data: true,
        can_manage_projects: true,
        can_approve_data: true,
        can_configure_system: true,
        can_view_audit_logs: true,
        can_manage_integrations: true,
    };

    /// Returns the value of one flag.
    pub fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewData => self.can_view_data,
            Permission::EditData => self.can_edit_data,
            Permission::ExportData => self.can_export_data,
            Permission::ViewReports => self.can_view_reports,
            Permission::CreateReports => self.can_create_reports,
            Permission::ManageUsers => self.can_manage_users,
            Permission::AccessTaxonomy => self.can_access_taxonomy,
            Permission::AccessMolecular => self.can_access_molecular,
            Permission::AccessOceanography => self.can_access_oceanography,
            Permission::UploadData => self.can_upload_data,
            Permission::CreateSurveys => self.can_create_surveys,
            Permission::ModifyOwnSurveys => self.can_modify_own_surveys,
            Permission::ModifyOthersSurveys => self.can_modify_others_surveys,
            Permission::DeleteData => self.can_delete_data,
            Permission::AccessRestrictedData => self.can_access_restricted_data,
            Permission::ManageProjects => self.can_manage_projects,
            Permission::ApproveData => self.can_approve_data,
            Permission::ConfigureSystem => self.can_configure_system,
            Permission::ViewAuditLogs => self.can_view_audit_logs,
            Permission::ManageIntegrations => self.can_manage_integrations,
        }
    }

    /// Returns the granted permissions, in table order.
    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.get(*p))
    }

    /// Returns how many flags are set.
    pub fn granted_count(&self) -> usize {
        self.granted().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_permission_names_are_unique() {
        let mut names: Vec<&str> = Permission::ALL.iter().map(Permission::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Permission::ALL.len());
    }

    #[test]
    fn test_kebab_name() {
        assert_eq!(Permission::EditData.kebab_name(), "can-edit-data");
        assert_eq!(
            Permission::ModifyOthersSurveys.kebab_name(),
            "can-modify-others-surveys"
        );
    }

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!(
            "canAccessMolecular".parse::<Permission>().unwrap(),
            Permission::AccessMolecular
        );
        assert_eq!(
            "can-access-molecular".parse::<Permission>().unwrap(),
            Permission::AccessMolecular
        );
    }

    #[test]
    fn test_unknown_permission_is_rejected() {
        let err = "canLaunchSubmarine".parse::<Permission>().unwrap_err();
        assert!(matches!(
            err,
            RbacError::UnknownPermission(ref name) if name == "canLaunchSubmarine"
        ));
    }

    #[test]
    fn test_permission_serde_uses_flag_name() {
        let json = serde_json::to_string(&Permission::ViewAuditLogs).unwrap();
        assert_eq!(json, "\"canViewAuditLogs\"");

        let parsed: Permission = serde_json::from_str("\"canApproveData\"").unwrap();
        assert_eq!(parsed, Permission::ApproveData);

        assert!(serde_json::from_str::<Permission>("\"canFly\"").is_err());
    }

    #[test]
    fn test_flags_serialize_with_reference_keys() {
        let value = serde_json::to_value(PermissionFlags::POLICYMAKER).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), Permission::ALL.len());
        for permission in Permission::ALL {
            assert_eq!(
                object[permission.as_str()].as_bool(),
                Some(PermissionFlags::POLICYMAKER.get(permission)),
                "{permission}"
            );
        }
    }

    #[test]
    fn test_granted_count() {
        assert_eq!(PermissionFlags::ADMIN.granted_count(), 20);
        assert_eq!(PermissionFlags::POLICYMAKER.granted_count(), 4);
    }

    proptest! {
        #[test]
        fn prop_parse_display_agree(index in 0usize..Permission::ALL.len()) {
            let permission = Permission::ALL[index];
            prop_assert_eq!(permission.to_string().parse::<Permission>().unwrap(), permission);
            prop_assert_eq!(permission.kebab_name().parse::<Permission>().unwrap(), permission);
        }
    }
}

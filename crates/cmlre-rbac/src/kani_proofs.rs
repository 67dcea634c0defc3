//! Kani proofs for the role-permission table.
//!
//! Run with: `cargo kani --harness verify_*`

use crate::permissions::Permission;
use crate::roles::Role;
use crate::table::has_permission;

fn any_role() -> Role {
    let index: usize = kani::any();
    kani::assume(index < Role::ALL.len());
    Role::ALL[index]
}

fn any_permission() -> Permission {
    let index: usize = kani::any();
    kani::assume(index < Permission::ALL.len());
    Permission::ALL[index]
}

/// **Property**: Admin holds every permission.
#[kani::proof]
fn verify_admin_holds_every_permission() {
    let permission = any_permission();
    assert!(has_permission(Role::Admin, permission));
}

/// **Property**: Every other role is a subset of Admin.
#[kani::proof]
fn verify_roles_bounded_by_admin() {
    let role = any_role();
    let permission = any_permission();
    if has_permission(role, permission) {
        assert!(has_permission(Role::Admin, permission));
    }
}

/// **Property**: Only Admin may modify others' surveys or manage users.
#[kani::proof]
fn verify_privileged_flags_admin_only() {
    let role = any_role();
    if role != Role::Admin {
        assert!(!has_permission(role, Permission::ModifyOthersSurveys));
        assert!(!has_permission(role, Permission::ManageUsers));
        assert!(!has_permission(role, Permission::ConfigureSystem));
    }
}

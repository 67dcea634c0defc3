//! # cmlre-rbac: Role-Permission Table
//!
//! The static, total lookup from a [`Role`] to its [`PermissionFlags`]
//! record. Every role carries an explicit value for every [`Permission`];
//! the records are `const` struct literals, so adding a capability is a
//! compile-time change across all roles.
//!
//! ## Roles
//!
//! | Capability            | Scientist | Conservationist | Policymaker | Admin |
//! |-----------------------|-----------|-----------------|-------------|-------|
//! | View data             | ✓         | ✓               | ✓           | ✓     |
//! | Edit data             | ✓         | ✗               | ✗           | ✓     |
//! | Upload data           | ✓         | ✗               | ✗           | ✓     |
//! | Create surveys        | ✓         | ✓               | ✗           | ✓     |
//! | Modify others' surveys| ✗         | ✗               | ✗           | ✓     |
//! | Access molecular      | ✓         | ✗               | ✗           | ✓     |
//! | Manage users          | ✗         | ✗               | ✗           | ✓     |
//! | Configure system      | ✗         | ✗               | ✗           | ✓     |
//!
//! See [`permissions`] for the full 20-flag matrix.
//!
//! ## Examples
//!
//! ```
//! use cmlre_rbac::{Permission, Role, has_permission};
//!
//! assert!(has_permission(Role::Scientist, Permission::EditData));
//! assert!(!has_permission(Role::Conservationist, Permission::EditData));
//!
//! // String boundary: unknown names are typed errors, never silent `false`.
//! assert!(cmlre_rbac::get_flag("admin", "canManageUsers").unwrap());
//! assert!(cmlre_rbac::get_flag("captain", "canManageUsers").is_err());
//! ```

pub mod permissions;
pub mod roles;
pub mod table;

pub use permissions::{Permission, PermissionFlags};
pub use roles::Role;
pub use table::{RbacError, get_flag, has_permission};

// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;

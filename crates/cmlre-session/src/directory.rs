//! Demo user directory and the authenticator built on it.
//!
//! Authentication is a mock: any directory user signs in with the shared
//! demo password. There is no hashing or lockout.

use cmlre_abac::{ClearanceLevel, User, UserId};
use cmlre_rbac::Role;
use tracing::{info, warn};

use crate::error::{Result, SessionError};
use crate::session::{AuthState, SessionStore};

/// Password accepted for every demo account unless configured otherwise.
pub const DEFAULT_DEMO_PASSWORD: &str = "demo123";

/// Known user accounts.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The three reference accounts, one per non-admin role.
    pub fn demo() -> Self {
        Self::new(vec![
            User::new("1", "Aman Antil", "aman.antil@cmlre.gov.in", Role::Scientist)
                .with_department("Marine Biology")
                .with_avatar("/female-scientist-lab.png")
                .with_clearance(ClearanceLevel::Advanced)
                .with_specializations(["Oceanography", "Marine Biology", "Data Analysis"])
                .with_projects(["OS-2024-001", "OS-2024-002", "DS-2024-001"])
                .with_data_classifications(["public", "internal", "restricted"]),
            User::new("2", "Yogesh", "yogesh@cmlre.gov.in", Role::Conservationist)
                .with_department("Marine Conservation")
                .with_avatar("/male-conservationist.jpg")
                .with_clearance(ClearanceLevel::Standard)
                .with_specializations(["Conservation", "Ecosystem Management"])
                .with_projects(["OS-2024-001", "DS-2024-002"])
                .with_data_classifications(["public", "internal"]),
            User::new("3", "Yash", "yash@cmlre.gov.in", Role::Policymaker)
                .with_department("Policy & Planning")
                .with_avatar("/female-policymaker.jpg")
                .with_clearance(ClearanceLevel::Standard)
                .with_specializations(["Policy Analysis", "Environmental Planning"])
                .with_projects(["OS-2024-001"])
                .with_data_classifications(["public"]),
        ])
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn find_by_id(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }
}

/// Signs users in and out against a directory, persisting the session.
#[derive(Debug, Clone)]
pub struct Authenticator {
    directory: UserDirectory,
    session: SessionStore,
    demo_password: String,
}

impl Authenticator {
    pub fn new(directory: UserDirectory, session: SessionStore) -> Self {
        Self {
            directory,
            session,
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
        }
    }

    pub fn with_demo_password(mut self, password: impl Into<String>) -> Self {
        self.demo_password = password.into();
        self
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Restores the persisted session, if any.
    pub fn restore(&self) -> Result<AuthState> {
        Ok(AuthState {
            user: self.session.current()?,
        })
    }

    /// Signs in by email and password.
    ///
    /// Returns `Ok(None)` on bad credentials; the stored session is left
    /// untouched in that case.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<AuthState>> {
        let Some(user) = self.directory.find_by_email(email) else {
            warn!(email, "login rejected: unknown email");
            return Ok(None);
        };
        if password != self.demo_password {
            warn!(email, "login rejected: bad password");
            return Ok(None);
        }

        self.session.save(user)?;
        info!(user_id = %user.id, role = %user.role, "user signed in");
        Ok(Some(AuthState::signed_in(user.clone())))
    }

    pub fn logout(&self) -> Result<AuthState> {
        self.session.clear()?;
        info!("user signed out");
        Ok(AuthState::signed_out())
    }

    /// Switches the session to another directory user without a password.
    pub fn switch_user(&self, id: &UserId) -> Result<AuthState> {
        let user = self
            .directory
            .find_by_id(id)
            .ok_or_else(|| SessionError::UnknownUser(id.to_string()))?;
        self.session.save(user)?;
        info!(user_id = %user.id, role = %user.role, "switched user");
        Ok(AuthState::signed_in(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn authenticator() -> Authenticator {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        Authenticator::new(UserDirectory::demo(), session)
    }

    #[test]
    fn test_demo_directory_matches_reference_accounts() {
        let directory = UserDirectory::demo();
        assert_eq!(directory.users().len(), 3);

        let aman = directory.find_by_email("aman.antil@cmlre.gov.in").unwrap();
        assert_eq!(aman.role, Role::Scientist);
        assert_eq!(aman.clearance_level, Some(ClearanceLevel::Advanced));
        assert!(aman.data_classifications.contains("restricted"));

        let yash = directory.find_by_id(&UserId::from("3")).unwrap();
        assert_eq!(yash.department.as_deref(), Some("Policy & Planning"));
        assert_eq!(yash.project_access.len(), 1);
    }

    #[test]
    fn test_login_success_persists_session() {
        let auth = authenticator();
        let state = auth.login("yogesh@cmlre.gov.in", "demo123").unwrap().unwrap();

        assert!(state.is_authenticated());
        assert_eq!(auth.restore().unwrap(), state);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let auth = authenticator();
        assert!(auth.login("yogesh@cmlre.gov.in", "wrong").unwrap().is_none());
        assert!(auth.login("nobody@cmlre.gov.in", "demo123").unwrap().is_none());
        assert!(!auth.restore().unwrap().is_authenticated());
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let auth = authenticator();
        auth.login("yash@cmlre.gov.in", "demo123").unwrap();
        auth.login("yash@cmlre.gov.in", "nope").unwrap();

        let restored = auth.restore().unwrap().user.unwrap();
        assert_eq!(restored.name, "Yash");
    }

    #[test]
    fn test_configured_demo_password() {
        let auth = authenticator().with_demo_password("reef-2024");
        assert!(auth.login("yash@cmlre.gov.in", "demo123").unwrap().is_none());
        assert!(auth.login("yash@cmlre.gov.in", "reef-2024").unwrap().is_some());
    }

    #[test]
    fn test_logout_clears_session() {
        let auth = authenticator();
        auth.login("yash@cmlre.gov.in", "demo123").unwrap();
        let state = auth.logout().unwrap();

        assert!(!state.is_authenticated());
        assert!(!auth.restore().unwrap().is_authenticated());
    }

    #[test]
    fn test_switch_user() {
        let auth = authenticator();
        let state = auth.switch_user(&UserId::from("1")).unwrap();
        assert_eq!(state.user.unwrap().role, Role::Scientist);

        assert!(matches!(
            auth.switch_user(&UserId::from("99")),
            Err(SessionError::UnknownUser(id)) if id == "99"
        ));
        assert_eq!(auth.restore().unwrap().user.unwrap().id, UserId::from("1"));
    }

    #[test]
    fn test_session_survives_restart_with_file_store() {
        let temp = TempDir::new().unwrap();
        let open = || {
            let store = Arc::new(FileStore::open(temp.path()).unwrap());
            Authenticator::new(UserDirectory::demo(), SessionStore::new(store))
        };

        open().login("aman.antil@cmlre.gov.in", "demo123").unwrap();
        let restored = open().restore().unwrap().user.unwrap();
        assert_eq!(restored.name, "Aman Antil");
    }
}

//! Wires configuration into a ready-to-use set of services.

use std::sync::Arc;

use cmlre_audit::{AuditLogger, AuditSink, JsonLinesSink, MemorySink, RequestOrigin, TracingSink};
use cmlre_config::{AuditSinkKind, CmlreConfig};
use cmlre_session::{
    Authenticator, FileStore, KeyValueStore, SessionStore, SettingsStore, UserDirectory,
};
use tracing::debug;

use crate::access::{AccessControl, InputPolicy};
use crate::error::Result;

/// Session, settings and access-control services sharing one state
/// directory and one audit sink.
#[derive(Debug)]
pub struct Platform {
    config: CmlreConfig,
    access: AccessControl,
    auth: Authenticator,
    settings: SettingsStore,
    memory_audit: Option<Arc<MemorySink>>,
}

impl Platform {
    /// Opens the services described by `config`, creating the state
    /// directory (and audit file directory) if needed.
    pub fn open(config: CmlreConfig, origin: RequestOrigin) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.session.state_dir)?);
        Self::with_store(config, store, origin)
    }

    /// Like [`open`](Self::open) but over a caller-supplied store.
    pub fn with_store(
        config: CmlreConfig,
        store: Arc<dyn KeyValueStore>,
        origin: RequestOrigin,
    ) -> Result<Self> {
        let mut memory_audit = None;
        let sink: Arc<dyn AuditSink> = match config.audit.sink {
            AuditSinkKind::Tracing => Arc::new(TracingSink),
            AuditSinkKind::Memory => {
                let sink = Arc::new(MemorySink::new());
                memory_audit = Some(sink.clone());
                sink
            }
            AuditSinkKind::File => Arc::new(JsonLinesSink::open(&config.audit.path)?),
        };
        debug!(sink = %config.audit.sink, strict = config.access.strict, "platform opened");

        let access = AccessControl::new(
            AuditLogger::from_shared(sink).with_origin(origin),
            InputPolicy::from_strict(config.access.strict),
        )
        .with_evaluation_logging(config.access.log_evaluations);

        let session = SessionStore::with_key(store.clone(), config.session.session_key.clone());
        let auth = Authenticator::new(UserDirectory::demo(), session)
            .with_demo_password(config.session.demo_password.clone());
        let settings = SettingsStore::with_key(store, config.session.settings_key.clone());

        Ok(Self {
            config,
            access,
            auth,
            settings,
            memory_audit,
        })
    }

    pub fn config(&self) -> &CmlreConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The in-process audit log, when the memory sink is configured.
    pub fn memory_audit(&self) -> Option<&MemorySink> {
        self.memory_audit.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmlre_audit::AuditQuery;
    use cmlre_session::MemoryStore;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, sink: AuditSinkKind) -> CmlreConfig {
        let mut config = CmlreConfig::default();
        config.audit.sink = sink;
        config.resolve_paths(dir.path());
        config
    }

    #[test]
    fn test_open_creates_state_dir() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, AuditSinkKind::Tracing);
        let state_dir = config.session.state_dir.clone();

        let platform = Platform::open(config, RequestOrigin::new()).unwrap();
        assert!(state_dir.is_dir());
        assert_eq!(platform.access().policy(), InputPolicy::FailClosed);
        assert!(platform.memory_audit().is_none());
    }

    #[test]
    fn test_login_and_settings_share_store() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, AuditSinkKind::Tracing);
        let platform = Platform::open(config, RequestOrigin::new()).unwrap();

        platform.auth().login("yash@cmlre.gov.in", "demo123").unwrap().unwrap();
        platform
            .settings()
            .update(&serde_json::json!({ "theme": "dark" }))
            .unwrap();

        let state_dir = temp.path().join(".cmlre");
        assert!(state_dir.join("cmlre_user.json").exists());
        assert!(state_dir.join("user-settings.json").exists());
    }

    #[test]
    fn test_configured_keys_and_password() {
        let mut config = CmlreConfig::default();
        config.session.session_key = "alt_user".to_string();
        config.session.demo_password = "reef".to_string();
        let store = Arc::new(MemoryStore::new());

        let platform = Platform::with_store(config, store.clone(), RequestOrigin::new()).unwrap();
        assert!(platform.auth().login("yash@cmlre.gov.in", "demo123").unwrap().is_none());
        assert!(platform.auth().login("yash@cmlre.gov.in", "reef").unwrap().is_some());
        assert!(store.get("alt_user").unwrap().is_some());
    }

    #[test]
    fn test_memory_audit_sink() {
        let config = CmlreConfig::development();
        let store = Arc::new(MemoryStore::new());
        let platform = Platform::with_store(config, store, RequestOrigin::new()).unwrap();
        let user = UserDirectory::demo().users()[0].clone();

        platform.access().log_user_action(&user, "login", "session", None);
        let audit = platform.memory_audit().unwrap();
        assert_eq!(audit.query(&AuditQuery::default().with_action("login")).len(), 1);
        assert_eq!(platform.access().policy(), InputPolicy::Strict);
    }

    #[test]
    fn test_file_audit_sink() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, AuditSinkKind::File);
        let path = config.audit.path.clone();
        let origin = RequestOrigin::new().with_user_agent("test");
        let platform = Platform::open(config, origin).unwrap();
        let user = UserDirectory::demo().users()[1].clone();

        platform.access().log_user_action(&user, "data_upload", "CTD cast 7", None);
        let entries = JsonLinesSink::read_all(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_agent.as_deref(), Some("test"));
    }
}

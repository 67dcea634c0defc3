//! # cmlre-session: Sessions, Demo Directory and Settings
//!
//! Client-side state that survives between runs:
//!
//! - [`SessionStore`]: the signed-in user record
//! - [`Authenticator`]: login / logout / switch against a [`UserDirectory`]
//! - [`SettingsStore`]: user preferences with defaults
//!
//! All three sit on a [`KeyValueStore`] ([`FileStore`] on disk,
//! [`MemoryStore`] in tests).
//!
//! ```
//! use std::sync::Arc;
//! use cmlre_session::{Authenticator, MemoryStore, SessionStore, UserDirectory};
//!
//! let session = SessionStore::new(Arc::new(MemoryStore::new()));
//! let auth = Authenticator::new(UserDirectory::demo(), session);
//!
//! let state = auth.login("yash@cmlre.gov.in", "demo123").unwrap().unwrap();
//! assert_eq!(state.user.unwrap().name, "Yash");
//! assert!(auth.restore().unwrap().is_authenticated());
//! ```

pub mod directory;
pub mod error;
pub mod session;
pub mod settings;
pub mod store;

pub use directory::{Authenticator, DEFAULT_DEMO_PASSWORD, UserDirectory};
pub use error::{Result, SessionError, StoreError};
pub use session::{AuthState, SESSION_KEY, SessionStore};
pub use settings::{
    Language, NotificationSettings, SETTINGS_KEY, Settings, SettingsStore, Theme, Units,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};

//! User preferences.
//!
//! Stored as one JSON object under [`SETTINGS_KEY`]. Keys missing from the
//! stored object take their default; an unreadable object is replaced by
//! the defaults on load.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, SessionError};
use crate::store::KeyValueStore;

/// Default key for the stored settings object.
pub const SETTINGS_KEY: &str = "user-settings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub data_alerts: bool,
    pub reports: bool,
    pub system_updates: bool,
    pub research: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            data_alerts: true,
            reports: true,
            system_updates: true,
            research: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub timezone: String,
    pub units: Units,
    pub date_format: String,
    pub currency: String,
    pub notifications: NotificationSettings,
    pub data_sharing: bool,
    pub analytics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            timezone: "ist".to_string(),
            units: Units::default(),
            date_format: "dd-mm-yyyy".to_string(),
            currency: "inr".to_string(),
            notifications: NotificationSettings::default(),
            data_sharing: true,
            analytics: true,
        }
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Settings {
    /// Applies a partial update: each top-level key in `patch` replaces the
    /// current value of that key.
    pub fn patched(&self, patch: &Value) -> Result<Self> {
        let Value::Object(fields) = patch else {
            return Err(SessionError::InvalidSettings(
                "patch must be a JSON object".to_string(),
            ));
        };

        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in fields {
                current.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(merged).map_err(|e| SessionError::InvalidSettings(e.to_string()))
    }
}

/// Loads, updates and resets [`Settings`] in a key-value store.
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, SETTINGS_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the stored settings merged over the defaults.
    ///
    /// Unparsable data yields the defaults. Store I/O failures still
    /// propagate.
    pub fn load(&self) -> Result<Settings> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Settings::default());
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to parse saved settings");
                Ok(Settings::default())
            }
        }
    }

    /// Merges `patch` into the current settings and persists the result.
    pub fn update(&self, patch: &Value) -> Result<Settings> {
        let updated = self.load()?.patched(patch)?;
        self.save(&updated)?;
        debug!(key = %self.key, "settings updated");
        Ok(updated)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    /// Drops the stored settings and returns the defaults.
    pub fn reset(&self) -> Result<Settings> {
        self.store.remove(&self.key)?;
        Ok(Settings::default())
    }
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore").field("key", &self.key).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn store() -> (Arc<MemoryStore>, SettingsStore) {
        let backend = Arc::new(MemoryStore::new());
        (backend.clone(), SettingsStore::new(backend))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        let value = serde_json::to_value(&settings).unwrap();

        assert_eq!(value["theme"], "system");
        assert_eq!(value["language"], "en");
        assert_eq!(value["timezone"], "ist");
        assert_eq!(value["units"], "metric");
        assert_eq!(value["dateFormat"], "dd-mm-yyyy");
        assert_eq!(value["currency"], "inr");
        assert_eq!(value["notifications"]["research"], false);
        assert_eq!(value["notifications"]["dataAlerts"], true);
        assert_eq!(value["dataSharing"], true);
        assert_eq!(value["analytics"], true);
    }

    #[test]
    fn test_load_without_stored_value() {
        let (_, settings) = store();
        assert_eq!(settings.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_load_merges_over_defaults() {
        let (backend, settings) = store();
        backend
            .set(SETTINGS_KEY, r#"{"theme":"dark","currency":"usd"}"#)
            .unwrap();

        let loaded = settings.load().unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.currency, "usd");
        assert_eq!(loaded.timezone, "ist");
        assert!(loaded.analytics);
    }

    #[test]
    fn test_load_corrupt_falls_back_to_defaults() {
        let (backend, settings) = store();
        backend.set(SETTINGS_KEY, "{{{").unwrap();
        assert_eq!(settings.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_update_persists() {
        let (backend, settings) = store();
        let updated = settings
            .update(&json!({ "language": "ta", "analytics": false }))
            .unwrap();

        assert_eq!(updated.language, Language::Ta);
        assert!(!updated.analytics);
        assert_eq!(settings.load().unwrap(), updated);
        assert!(backend.get(SETTINGS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_update_replaces_top_level_keys() {
        let (_, settings) = store();
        let updated = settings
            .update(&json!({ "notifications": { "research": true } }))
            .unwrap();

        assert!(updated.notifications.research);
        assert!(updated.notifications.email);
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let (_, settings) = store();
        assert!(matches!(
            settings.update(&json!({ "theme": "neon" })),
            Err(SessionError::InvalidSettings(_))
        ));
        assert!(matches!(
            settings.update(&json!(["theme"])),
            Err(SessionError::InvalidSettings(_))
        ));
        assert_eq!(settings.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_reset_removes_key() {
        let (backend, settings) = store();
        settings.update(&json!({ "theme": "light" })).unwrap();

        assert_eq!(settings.reset().unwrap(), Settings::default());
        assert!(backend.get(SETTINGS_KEY).unwrap().is_none());
    }
}

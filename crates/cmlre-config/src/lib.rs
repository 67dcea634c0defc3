//! Configuration management for CMLRE access control
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (CMLRE_* prefix, `__` between section and key)
//! 3. cmlre.local.toml (gitignored, local overrides)
//! 4. cmlre.toml (git-tracked, project config)
//! 5. ~/.config/cmlre/config.toml (user defaults)
//! 6. Built-in defaults of the selected [`Profile`] (lowest precedence)

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{LOCAL_CONFIG, PROJECT_CONFIG, config_files, user_config_file};

/// Main CMLRE configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CmlreConfig {
    pub access: AccessConfig,
    pub audit: AuditConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Unknown permission/action/module names are errors instead of denials.
    pub strict: bool,
    /// Gates log every decision to the audit trail.
    pub log_evaluations: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            strict: false,
            log_evaluations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub sink: AuditSinkKind,
    /// Used when `sink = "file"`.
    pub path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            sink: AuditSinkKind::Tracing,
            path: PathBuf::from(".cmlre/audit.jsonl"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuditSinkKind {
    Tracing,
    Memory,
    File,
}

impl Display for AuditSinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditSinkKind::Tracing => "tracing",
            AuditSinkKind::Memory => "memory",
            AuditSinkKind::File => "file",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub state_dir: PathBuf,
    pub session_key: String,
    pub settings_key: String,
    pub demo_password: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".cmlre"),
            session_key: "cmlre_user".to_string(),
            settings_key: "user-settings".to_string(),
            demo_password: "demo123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when RUST_LOG is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Built-in defaults the file and environment layers start from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Default,
    Development,
    Production,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Default => "default",
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Profile::Default),
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl CmlreConfig {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::default(),
            Profile::Development => Self::development(),
            Profile::Production => Self::production(),
        }
    }

    /// Development preset: malformed input fails loudly, audit kept in memory.
    pub fn development() -> Self {
        Self {
            access: AccessConfig {
                strict: true,
                ..Default::default()
            },
            audit: AuditConfig {
                sink: AuditSinkKind::Memory,
                ..Default::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
            ..Default::default()
        }
    }

    /// Production preset: malformed input is denied, audit persisted to disk.
    pub fn production() -> Self {
        Self {
            access: AccessConfig {
                strict: false,
                log_evaluations: true,
            },
            audit: AuditConfig {
                sink: AuditSinkKind::File,
                ..Default::default()
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
            ..Default::default()
        }
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, key) in [
            ("session.session_key", &self.session.session_key),
            ("session.settings_key", &self.session.settings_key),
        ] {
            let valid = !key.is_empty()
                && key
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
            if !valid {
                return Err(ConfigError::InvalidStoreKey {
                    field: name,
                    value: key.clone(),
                });
            }
        }

        if self.session.demo_password.is_empty() {
            return Err(ConfigError::EmptyDemoPassword);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.session.state_dir.is_relative() {
            self.session.state_dir = base.join(&self.session.state_dir);
        }

        if self.audit.path.is_relative() {
            self.audit.path = base.join(&self.audit.path);
        }
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

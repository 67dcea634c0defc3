//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A session or settings key would not be a safe state file name.
    #[error("{field} '{value}' may only contain letters, digits, '-' or '_'")]
    InvalidStoreKey { field: &'static str, value: String },

    #[error("session.demo_password must not be empty")]
    EmptyDemoPassword,

    #[error("Unknown profile '{0}' (expected default, development or production)")]
    UnknownProfile(String),

    #[error("Failed to render configuration as TOML: {0}")]
    Render(#[from] toml::ser::Error),
}

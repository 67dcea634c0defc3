//! Configuration loader with multi-source merging

use crate::{CmlreConfig, Profile, config_files};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Prefix of environment overrides (`CMLRE_SECTION__KEY`).
const ENV_PREFIX: &str = "CMLRE";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    profile: Profile,
    env_source: Option<HashMap<String, String>>,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            profile: Profile::Default,
            env_source: None,
            include_user_config: true,
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Start from the defaults of `profile` instead of the plain defaults.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Read environment overrides from `vars` instead of the process
    /// environment.
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Skip ~/.config/cmlre/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<CmlreConfig> {
        let mut builder = config::Config::builder();

        // 1. Profile defaults
        let defaults = CmlreConfig::for_profile(self.profile);
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2-4. User, project and local files
        for file in config_files(&self.project_dir, self.include_user_config) {
            if file.exists() {
                builder = builder.add_source(
                    config::File::from(file)
                        .required(false)
                        .format(config::FileFormat::Toml),
                );
            }
        }

        // 5. Environment variables (CMLRE_SECTION__KEY)
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env_source.map(|vars| vars.into_iter().collect()));
        builder = builder.add_source(environment);

        let config = builder.build().context("Failed to build configuration")?;

        let mut cmlre_config: CmlreConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        cmlre_config
            .validate()
            .context("Configuration failed validation")?;
        cmlre_config.resolve_paths(&self.project_dir);

        Ok(cmlre_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuditSinkKind;
    use std::fs;
    use tempfile::tempdir;

    fn loader(project_dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(project_dir)
            .without_user_config()
            .with_env_source(HashMap::new())
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert!(!config.access.strict);
        assert_eq!(config.audit.sink, AuditSinkKind::Tracing);
        assert_eq!(config.session.session_key, "cmlre_user");
        assert_eq!(config.session.settings_key, "user-settings");
        assert_eq!(config.session.demo_password, "demo123");
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[access]
strict = true

[audit]
sink = "file"
path = "logs/audit.jsonl"

[logging]
level = "debug"
"#;
        fs::write(project_dir.join("cmlre.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert!(config.access.strict);
        assert_eq!(config.audit.sink, AuditSinkKind::File);
        assert_eq!(config.audit.path, project_dir.join("logs/audit.jsonl"));
        assert_eq!(config.logging.level, "debug");
        // Untouched sections keep their defaults
        assert!(config.access.log_evaluations);
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("cmlre.toml"),
            "[session]\ndemo_password = \"from-project\"\n",
        )
        .expect("Failed to write project config");
        fs::write(
            project_dir.join("cmlre.local.toml"),
            "[session]\ndemo_password = \"from-local\"\n",
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");
        assert_eq!(config.session.demo_password, "from-local");
    }

    #[test]
    fn test_env_overrides_files() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        fs::write(project_dir.join("cmlre.toml"), "[access]\nstrict = false\n")
            .expect("Failed to write config");

        let vars = HashMap::from([
            ("CMLRE_ACCESS__STRICT".to_string(), "true".to_string()),
            ("CMLRE_AUDIT__SINK".to_string(), "memory".to_string()),
        ]);
        let config = loader(project_dir)
            .with_env_source(vars)
            .load()
            .expect("Failed to load config");

        assert!(config.access.strict);
        assert_eq!(config.audit.sink, AuditSinkKind::Memory);
    }

    #[test]
    fn test_profile_defaults_under_project_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        fs::write(project_dir.join("cmlre.toml"), "[logging]\nlevel = \"info\"\n")
            .expect("Failed to write config");

        let config = loader(project_dir)
            .with_profile(Profile::Production)
            .load()
            .expect("Failed to load config");

        assert_eq!(config.audit.sink, AuditSinkKind::File);
        assert_eq!(config.audit.path, project_dir.join(".cmlre/audit.jsonl"));
        // The project file still wins over the profile
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_session_key_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        fs::write(
            project_dir.join("cmlre.toml"),
            "[session]\nsession_key = \"../user\"\n",
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
    }

    #[test]
    fn test_path_resolution() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert!(config.session.state_dir.is_absolute());
        assert!(config.audit.path.is_absolute());
    }
}

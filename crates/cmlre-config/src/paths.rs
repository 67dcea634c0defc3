//! Files a CMLRE project reads its configuration from.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Checked-in project settings.
pub const PROJECT_CONFIG: &str = "cmlre.toml";

/// Per-machine overrides, kept out of version control.
pub const LOCAL_CONFIG: &str = "cmlre.local.toml";

/// The per-user defaults file, `~/.config/cmlre/config.toml` on Linux.
///
/// `None` when the platform has no home directory to anchor it.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("in.gov", "CMLRE", "cmlre")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Configuration files for `project_dir`, lowest precedence first.
///
/// Files are listed whether or not they exist.
pub fn config_files(project_dir: &Path, include_user: bool) -> Vec<PathBuf> {
    let mut files = Vec::with_capacity(3);
    if include_user {
        files.extend(user_config_file());
    }
    files.push(project_dir.join(PROJECT_CONFIG));
    files.push(project_dir.join(LOCAL_CONFIG));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_files_in_precedence_order() {
        let files = config_files(Path::new("/srv/survey"), false);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/srv/survey/cmlre.toml"),
                PathBuf::from("/srv/survey/cmlre.local.toml"),
            ]
        );
    }

    #[test]
    fn test_user_file_comes_first() {
        let files = config_files(Path::new("/srv/survey"), true);
        if let Some(user_file) = user_config_file() {
            assert_eq!(files.len(), 3);
            assert_eq!(files[0], user_file);
            assert!(user_file.ends_with("config.toml"));
        }
    }
}

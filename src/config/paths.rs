use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "threadmail";

/// Per-profile files live together under `<root>/profiles/<profile>/`.
/// Directories are created lazily by whichever writer needs them.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        Ok(Self::at(&config_root.join(APP_DIR)))
    }

    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn profile_dir(&self, profile: &str) -> PathBuf {
        self.root.join("profiles").join(profile)
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profile_dir(profile).join("settings.json")
    }

    pub fn session_file(&self, profile: &str) -> PathBuf {
        self.profile_dir(profile).join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_files_share_one_directory() {
        let paths = AppPaths::at(Path::new("/tmp/tm"));
        assert_eq!(
            paths.settings_file("work"),
            Path::new("/tmp/tm/profiles/work/settings.json")
        );
        assert_eq!(
            paths.session_file("work").parent(),
            Some(paths.profile_dir("work").as_path())
        );
    }
}

use std::fs;

use crate::config::AppPaths;
use crate::error::AppResult;

use super::CurrentUser;

pub trait SessionStore {
    fn load(&self, profile: &str) -> AppResult<Option<CurrentUser>>;
    fn save(&self, profile: &str, user: &CurrentUser) -> AppResult<()>;
    fn clear(&self, profile: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    paths: AppPaths,
}

impl FileSessionStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, profile: &str) -> AppResult<Option<CurrentUser>> {
        let path = self.paths.session_file(profile);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let user = serde_json::from_str(&raw)?;
        Ok(Some(user))
    }

    fn save(&self, profile: &str, user: &CurrentUser) -> AppResult<()> {
        let path = self.paths.session_file(profile);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(user)?;
        fs::write(&path, payload)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    fn clear(&self, profile: &str) -> AppResult<()> {
        let path = self.paths.session_file(profile);
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

pub mod paths;
pub mod profile;
pub mod settings;

pub use paths::AppPaths;
pub use profile::resolve_profile;
pub use settings::Settings;

use crate::error::AppResult;

/// Settings for `profile`, or defaults when the profile has never been
/// configured.
pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    Settings::load_from(&paths.settings_file(profile))
}

pub fn save_settings(paths: &AppPaths, profile: &str, settings: &Settings) -> AppResult<()> {
    settings.save_to(&paths.settings_file(profile))
}

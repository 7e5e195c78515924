use crate::api::MailApiClient;
use crate::config::{self, AppPaths, Settings};
use crate::error::{AppError, AppResult};
use crate::output::Output;
use crate::session::{CurrentUser, FileSessionStore, SessionStore};

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub verbose: u8,
    pub paths: AppPaths,
    pub settings: Settings,
    pub session_store: FileSessionStore,
    pub client: MailApiClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool, verbose: u8) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile);
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let session_store = FileSessionStore::new(paths.clone());
        let client = MailApiClient::new(settings.api_base_url()?);
        let output = Output::new(json);

        Ok(Self {
            profile,
            verbose,
            paths,
            settings,
            session_store,
            client,
            output,
        })
    }

    /// The signed-in user for this profile.
    pub fn current_user(&self) -> AppResult<CurrentUser> {
        self.session_store.load(&self.profile)?.ok_or_else(|| {
            AppError::Session(format!(
                "no user for profile `{}`. run `threadmail session set`",
                self.profile
            ))
        })
    }
}

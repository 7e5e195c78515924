use serde::Serialize;

use crate::cli::{ConfigCommand, ConfigSetArgs};
use crate::config::{self, Settings};
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub profile: String,
    pub profile_dir: String,
    pub api_base_url: String,
    pub sender_name: Option<String>,
}

pub fn run(ctx: &AppContext, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => show(ctx, &ctx.settings),
        ConfigCommand::Set(args) => {
            let settings = apply(ctx.settings.clone(), args);
            // Fail before writing anything the next run could not load.
            settings.api_base_url()?;
            config::save_settings(&ctx.paths, &ctx.profile, &settings)?;
            show(ctx, &settings)
        }
    }
}

fn apply(mut settings: Settings, args: ConfigSetArgs) -> Settings {
    if let Some(url) = args.api_base_url {
        settings.api_base_url = Some(url.trim().to_string());
    }
    if let Some(name) = args.sender_name {
        settings.sender_name = Some(name.trim().to_string()).filter(|value| !value.is_empty());
    }
    settings
}

fn show(ctx: &AppContext, settings: &Settings) -> AppResult<()> {
    let view = ConfigView {
        profile: ctx.profile.clone(),
        profile_dir: ctx.paths.profile_dir(&ctx.profile).display().to_string(),
        api_base_url: settings.api_base_url()?.to_string(),
        sender_name: settings.sender_name().map(ToOwned::to_owned),
    };

    let text = format!(
        "{}: store {} (sender name: {})",
        view.profile,
        view.api_base_url,
        view.sender_name.as_deref().unwrap_or("unset")
    );
    ctx.output.emit(&text, &view)
}

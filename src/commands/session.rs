use serde::Serialize;

use crate::cli::SessionCommand;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::session::{CurrentUser, SessionStore};

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub profile: String,
    pub signed_in: bool,
    pub user: Option<CurrentUser>,
}

pub fn run(ctx: &AppContext, command: SessionCommand) -> AppResult<()> {
    match command {
        SessionCommand::Set(args) => {
            let user = CurrentUser::new(&args.id, &args.email, args.name.as_deref())?;
            ctx.session_store.save(&ctx.profile, &user)?;

            let text = format!("{}: signed in as {}", ctx.profile, user.email);
            ctx.output.emit(&text, &status(ctx, Some(user)))
        }
        SessionCommand::Show => {
            let user = ctx.session_store.load(&ctx.profile)?;
            let text = match &user {
                Some(user) => match &user.name {
                    Some(name) => format!("{}: {} <{}> (id {})", ctx.profile, name, user.email, user.id),
                    None => format!("{}: {} (id {})", ctx.profile, user.email, user.id),
                },
                None => format!("{}: signed out", ctx.profile),
            };
            ctx.output.emit(&text, &status(ctx, user))
        }
        SessionCommand::Clear => {
            ctx.session_store.clear(&ctx.profile)?;
            let text = format!("{}: signed out", ctx.profile);
            ctx.output.emit(&text, &status(ctx, None))
        }
    }
}

fn status(ctx: &AppContext, user: Option<CurrentUser>) -> SessionStatus {
    SessionStatus {
        profile: ctx.profile.clone(),
        signed_in: user.is_some(),
        user,
    }
}

use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::logging;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose,
        command,
    } = cli;

    logging::init(verbose);
    let ctx = AppContext::bootstrap(profile, json, verbose)?;

    match command {
        Command::Session(args) => commands::session::run(&ctx, args.command),
        Command::Config(args) => commands::config::run(&ctx, args.command),
        Command::Folders => commands::folders::run(&ctx).await,
        Command::Thread(args) => commands::thread::run(&ctx, args).await,
        Command::Reply(args) => commands::reply::run(&ctx, args).await,
        Command::Forward(args) => commands::reply::forward(&ctx, args).await,
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Draft(args) => commands::draft::run(&ctx, args).await,
        Command::Render(args) => commands::render::run(&ctx, args),
    }
}

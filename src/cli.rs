use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "threadmail", version, about = "Webmail thread and reply toolkit")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Session(SessionArgs),
    Config(ConfigArgs),
    Folders,
    Thread(ThreadArgs),
    Reply(ReplyArgs),
    Forward(ForwardArgs),
    Send(SendArgs),
    Draft(DraftArgs),
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    Set(SessionSetArgs),
    Show,
    Clear,
}

#[derive(Debug, Args)]
pub struct SessionSetArgs {
    #[arg(long, help = "User id in the message store")]
    pub id: String,
    #[arg(long, help = "Email address of the user")]
    pub email: String,
    #[arg(long, help = "Display name")]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show,
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    #[arg(long, help = "Base URL of the message store API")]
    pub api_base_url: Option<String>,
    #[arg(long, help = "Display name used on outgoing mail")]
    pub sender_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ThreadArgs {
    #[arg(help = "Thread id")]
    pub thread_id: String,
    #[arg(long, help = "Expand every message, not only the newest")]
    pub expand_all: bool,
    #[arg(long, help = "Show quoted history inside expanded messages")]
    pub quoted: bool,
}

#[derive(Debug, Args)]
pub struct BodyArgs {
    #[arg(long, help = "Inline body text (Markdown)")]
    pub body: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, help = "Read body from stdin")]
    pub stdin: bool,
}

#[derive(Debug, Args)]
pub struct ReplyArgs {
    #[arg(help = "Thread id")]
    pub thread_id: String,
    #[arg(help = "Message id to reply to")]
    pub message_id: String,
    #[arg(long, help = "Reply to the sender and every recipient")]
    pub all: bool,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Extra CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[command(flatten)]
    pub body: BodyArgs,
    #[arg(long, help = "Save as draft instead of sending")]
    pub draft: bool,
}

#[derive(Debug, Args)]
pub struct ForwardArgs {
    #[arg(help = "Thread id")]
    pub thread_id: String,
    #[arg(help = "Message id to forward")]
    pub message_id: String,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[command(flatten)]
    pub body: BodyArgs,
    #[arg(long, help = "Save as draft instead of sending")]
    pub draft: bool,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, visible_alias = "subj", help = "Email subject")]
    pub subject: String,
    #[command(flatten)]
    pub body: BodyArgs,
    #[arg(long, help = "Save as draft instead of sending")]
    pub draft: bool,
}

#[derive(Debug, Args)]
pub struct DraftArgs {
    #[arg(help = "Thread id the draft belongs to")]
    pub thread_id: String,
    #[arg(help = "Draft message id")]
    pub draft_id: String,
    #[arg(long, help = "Send the reopened draft right away")]
    pub send: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum RenderMode {
    Normalize,
    Display,
    Collapse,
    Split,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(long, value_enum, default_value_t = RenderMode::Display, help = "Pipeline stage to run")]
    pub mode: RenderMode,
    #[command(flatten)]
    pub body: BodyArgs,
}

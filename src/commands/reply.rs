use crate::cli::{ForwardArgs, ReplyArgs};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::compose::{self, ReplyMode};

use super::{deliver, load_message, read_body};

pub async fn run(ctx: &AppContext, args: ReplyArgs) -> AppResult<()> {
    let mode = if args.all {
        ReplyMode::ReplyAll
    } else {
        ReplyMode::Reply
    };
    let new_text = read_body(&args.body, false)?;
    let user = ctx.current_user()?;

    let source = load_message(ctx, &user, &args.thread_id, &args.message_id).await?;
    let mut outgoing = compose::build_reply(&source, mode, &user.email, &new_text)?;
    outgoing.cc = merge_extra(outgoing.cc, args.cc);
    outgoing.bcc = merge_extra(outgoing.bcc, args.bcc);

    deliver(ctx, &user, outgoing, args.draft).await
}

pub async fn forward(ctx: &AppContext, args: ForwardArgs) -> AppResult<()> {
    let to = merge_extra(Vec::new(), args.to);
    let cc = merge_extra(Vec::new(), args.cc);
    let bcc = merge_extra(Vec::new(), args.bcc);
    if !args.draft && to.is_empty() && cc.is_empty() && bcc.is_empty() {
        return Err(AppError::InvalidInput(
            "forward needs at least one of --to, --cc or --bcc".to_string(),
        ));
    }

    let new_text = read_body(&args.body, false)?;
    let user = ctx.current_user()?;

    let source = load_message(ctx, &user, &args.thread_id, &args.message_id).await?;
    let mut outgoing = compose::build_reply(&source, ReplyMode::Forward, &user.email, &new_text)?;
    outgoing.to = to;
    outgoing.cc = cc;
    outgoing.bcc = bcc;

    deliver(ctx, &user, outgoing, args.draft).await
}

/// Appends user-entered addresses, skipping blanks and repeats.
fn merge_extra(existing: Vec<String>, extra: Vec<String>) -> Vec<String> {
    let joined = existing
        .into_iter()
        .chain(extra)
        .collect::<Vec<_>>()
        .join(",");
    compose::split_addresses(&joined)
}

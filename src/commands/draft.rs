use crate::cli::DraftArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::compose;
use crate::output::text;

use super::{deliver, load_message};

pub async fn run(ctx: &AppContext, args: DraftArgs) -> AppResult<()> {
    let user = ctx.current_user()?;
    let draft = load_message(ctx, &user, &args.thread_id, &args.draft_id).await?;

    // The stored draft is deleted on reopen, so refuse an unsendable one first.
    if args.send && draft.to.is_empty() && draft.cc.is_empty() && draft.bcc.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "draft {} has no recipients; reopen it without --send",
            draft.id
        )));
    }

    let form = compose::reopen_draft(&ctx.client, &draft).await?;
    if args.send {
        return deliver(ctx, &user, form.into_outgoing(), false).await;
    }

    if ctx.output.is_text() {
        println!("to: {}", form.to);
        if !form.cc.is_empty() {
            println!("cc: {}", form.cc);
        }
        if !form.bcc.is_empty() {
            println!("bcc: {}", form.bcc);
        }
        println!("subject: {}", form.subject);
        println!();
        text::print_indented(&form.body, 0);
        return Ok(());
    }

    let text = format!("reopened draft {}", draft.id);
    ctx.output.emit(&text, &form)
}

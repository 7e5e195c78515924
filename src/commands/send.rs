use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::compose;

use super::{deliver, read_body};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let body = read_body(&args.body, true)?;
    let user = ctx.current_user()?;
    let outgoing = compose::compose_new(args.to, args.cc, args.bcc, &args.subject, &body);
    deliver(ctx, &user, outgoing, args.draft).await
}

pub mod config;
pub mod draft;
pub mod folders;
pub mod render;
pub mod reply;
pub mod send;
pub mod session;
pub mod thread;

use std::fs;
use std::io::{self, Read};

use serde::Serialize;

use crate::cli::BodyArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::compose;
use crate::mail::model::{Message, OutgoingMessage};
use crate::session::CurrentUser;
use crate::store::{FolderStore, MessageStore};

#[derive(Debug, Serialize)]
pub struct DeliveryResult {
    pub id: String,
    pub draft: bool,
    pub subject: String,
    pub recipients: Vec<String>,
    pub thread_id: Option<String>,
}

/// Reads the body from exactly one source. With `required == false` no
/// source at all yields an empty body.
pub(crate) fn read_body(args: &BodyArgs, required: bool) -> AppResult<String> {
    let selected = [args.body.is_some(), args.body_file.is_some(), args.stdin]
        .into_iter()
        .filter(|chosen| *chosen)
        .count();

    if selected > 1 {
        return Err(AppError::InvalidInput(
            "pass only one body source: --body, --body-file, or --stdin".to_string(),
        ));
    }

    if let Some(body) = &args.body {
        return Ok(body.clone());
    }

    if let Some(path) = &args.body_file {
        return Ok(fs::read_to_string(path)?);
    }

    if args.stdin {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }

    if required {
        return Err(AppError::InvalidInput(
            "missing body source; pass one of --body, --body-file, or --stdin".to_string(),
        ));
    }

    Ok(String::new())
}

/// Finds one message of a thread without loading attachments.
pub(crate) async fn load_message(
    ctx: &AppContext,
    user: &CurrentUser,
    thread_id: &str,
    message_id: &str,
) -> AppResult<Message> {
    ctx.client
        .get_thread(thread_id, &user.id)
        .await?
        .into_iter()
        .find(|message| message.id == message_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("message {message_id} in thread {thread_id}"))
        })
}

/// Validates, places and stores an outgoing message.
pub(crate) async fn deliver(
    ctx: &AppContext,
    user: &CurrentUser,
    outgoing: OutgoingMessage,
    draft: bool,
) -> AppResult<()> {
    compose::ensure_sendable(&outgoing, draft)?;

    let folders = ctx.client.folder_map(&user.id).await?;
    let payload = compose::into_payload(
        outgoing,
        user,
        ctx.settings.sender_name(),
        &folders,
        draft,
    )?;
    let created = compose::submit(&ctx.client, &payload).await?;

    let result = DeliveryResult {
        id: created.id,
        draft,
        subject: payload.subject.clone(),
        recipients: payload
            .to
            .iter()
            .chain(&payload.cc)
            .chain(&payload.bcc)
            .cloned()
            .collect(),
        thread_id: payload.thread_id.clone(),
    };

    let text = if draft {
        format!("saved draft {}", result.id)
    } else {
        format!("sent message {} to {}", result.id, result.recipients.join(", "))
    };
    ctx.output.emit(&text, &result)
}

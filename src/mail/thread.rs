//! Thread assembly: fetch, order, enrich.

use std::collections::HashMap;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::mail::model::{Attachment, AttachmentContent, Message};
use crate::mail::normalize::{looks_like_html, normalize, to_display_html};
use crate::mail::quote::{QuoteSplit, split_quoted};
use crate::store::MessageStore;

static CID_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"cid:([^\s"'<>()]+)"#).expect("static regex")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttachmentState {
    Loaded(AttachmentContent),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedAttachment {
    pub attachment: Attachment,
    pub state: AttachmentState,
}

impl LoadedAttachment {
    pub fn content(&self) -> Option<&AttachmentContent> {
        match &self.state {
            AttachmentState::Loaded(content) => Some(content),
            AttachmentState::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadEntry {
    pub message: Message,
    pub attachments: Vec<LoadedAttachment>,
    /// Render default only; the newest message starts expanded.
    pub expanded: bool,
}

impl ThreadEntry {
    /// The body as shown in the reading view, split into new content and
    /// quoted history.
    pub fn rendered_body(&self) -> QuoteSplit {
        let body = self.message.body.as_deref().unwrap_or_default();
        if looks_like_html(body) {
            split_quoted(body)
        } else {
            split_quoted(&to_display_html(&normalize(Some(body))))
        }
    }
}

/// Messages of one conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadView {
    pub thread_id: String,
    pub entries: Vec<ThreadEntry>,
}

impl ThreadView {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetches a thread, orders it oldest first and loads attachments.
///
/// A failed thread fetch is returned as an error. A failed attachment fetch
/// is recorded on that attachment only and never fails the thread.
pub async fn assemble_thread<S>(store: &S, thread_id: &str, user_id: &str) -> AppResult<ThreadView>
where
    S: MessageStore + ?Sized,
{
    let mut messages = store.get_thread(thread_id, user_id).await?;
    messages.sort_by_key(|message| message.created_at);

    let mut entries = Vec::with_capacity(messages.len());
    for message in messages {
        entries.push(enrich(store, message).await);
    }

    if let Some(latest) = entries.last_mut() {
        latest.expanded = true;
    }

    info!(thread = thread_id, messages = entries.len(), "thread assembled");
    Ok(ThreadView {
        thread_id: thread_id.to_string(),
        entries,
    })
}

async fn enrich<S>(store: &S, mut message: Message) -> ThreadEntry
where
    S: MessageStore + ?Sized,
{
    if !message.has_attachments() {
        return ThreadEntry {
            message,
            attachments: Vec::new(),
            expanded: false,
        };
    }

    let mut attachments = Vec::with_capacity(message.attachments.len());
    for attachment in &message.attachments {
        let state = match store.get_attachment(&message.id, &attachment.id).await {
            Ok(content) => {
                debug!(message = %message.id, attachment = %attachment.id, "attachment loaded");
                AttachmentState::Loaded(content)
            }
            Err(err) => {
                warn!(
                    message = %message.id,
                    attachment = %attachment.id,
                    error = %err,
                    "attachment fetch failed"
                );
                AttachmentState::Failed {
                    reason: err.to_string(),
                }
            }
        };
        attachments.push(LoadedAttachment {
            attachment: attachment.clone(),
            state,
        });
    }

    if let Some(body) = message.body.as_mut() {
        *body = resolve_inline_images(body, &attachments);
    }

    ThreadEntry {
        message,
        attachments,
        expanded: false,
    }
}

/// Replaces every `cid:<content-id>` reference with a `data:` URI built from
/// the loaded attachment. Failed or non-inline attachments are left alone.
///
/// References are matched whole, so `cid:img1` never rewrites part of
/// `cid:img10`.
pub fn resolve_inline_images(body: &str, attachments: &[LoadedAttachment]) -> String {
    let uris = attachments
        .iter()
        .filter(|item| item.attachment.is_inline())
        .filter_map(|item| {
            let content_id = bare_content_id(item.attachment.content_id.as_deref()?);
            let content = item.content()?;
            let uri = format!(
                "data:{};base64,{}",
                content.mime_type,
                STANDARD.encode(&content.data)
            );
            Some((content_id, uri))
        })
        .collect::<HashMap<_, _>>();

    if uris.is_empty() {
        return body.to_string();
    }

    CID_REFERENCE
        .replace_all(body, |caps: &Captures<'_>| match uris.get(&caps[1]) {
            Some(uri) => uri.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Stored content ids sometimes keep their `<...>` header brackets.
fn bare_content_id(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('<')
        .and_then(|value| value.strip_suffix('>'))
        .unwrap_or(trimmed)
}

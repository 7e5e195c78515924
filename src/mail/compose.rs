use chrono::{DateTime, Utc};
use pulldown_cmark::{Options, Parser};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::mail::model::{
    CreateMessagePayload, CreatedMessage, FolderKind, FolderMap, Message, OutgoingMessage,
};
use crate::mail::normalize::{normalize, to_display_html};
use crate::session::CurrentUser;
use crate::store::MessageStore;

const QUOTE_STYLE: &str = "margin:0 0 0 .8ex;border-left:1px solid #ccc;padding-left:1ex";
const FORWARD_MARKER: &str = "---------- Forwarded message ---------";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplyMode {
    Reply,
    ReplyAll,
    Forward,
}

/// Builds a reply, reply-all or forward of `source`.
///
/// Reply modes fail with `InvalidInput` when no recipient survives; a forward
/// always starts with no recipients. The quoted source is baked into the
/// returned body.
pub fn build_reply(
    source: &Message,
    mode: ReplyMode,
    current_user_email: &str,
    new_body_text: &str,
) -> AppResult<OutgoingMessage> {
    let to = resolve_recipients(source, mode, current_user_email);
    if to.is_empty() && mode != ReplyMode::Forward {
        return Err(AppError::InvalidInput(format!(
            "no recipients left to reply to on message {}",
            source.id
        )));
    }

    let in_reply_to = threading_parent(source);
    let references = merge_references(source.reference_ids(), in_reply_to.as_deref());
    let subject = match mode {
        ReplyMode::Reply | ReplyMode::ReplyAll => ensure_reply_subject(&source.subject),
        ReplyMode::Forward => format!("Fwd: {}", source.subject),
    };

    let mut body = render_new_text(new_body_text);
    body.push_str(&quoted_block(source, mode));

    debug!(
        source = %source.id,
        ?mode,
        recipients = to.len(),
        "composed reply"
    );

    Ok(OutgoingMessage {
        to,
        cc: Vec::new(),
        bcc: Vec::new(),
        subject,
        body,
        in_reply_to,
        references,
        thread_id: Some(source.thread_key().to_string()),
    })
}

/// Builds a fresh message that starts its own thread.
pub fn compose_new(
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: &str,
    body_text: &str,
) -> OutgoingMessage {
    OutgoingMessage {
        to: dedupe_addresses(to.iter().map(String::as_str), None),
        cc: dedupe_addresses(cc.iter().map(String::as_str), None),
        bcc: dedupe_addresses(bcc.iter().map(String::as_str), None),
        subject: subject.trim().to_string(),
        body: render_new_text(body_text),
        in_reply_to: None,
        references: None,
        thread_id: None,
    }
}

/// Renders user-entered Markdown as an HTML fragment.
pub fn render_new_text(markdown: &str) -> String {
    let trimmed = markdown.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(trimmed, options));
    html.trim_end().to_string()
}

/// Rejects a send with no recipients at all. Drafts may be saved empty.
pub fn ensure_sendable(outgoing: &OutgoingMessage, draft: bool) -> AppResult<()> {
    if !draft && outgoing.recipient_count() == 0 {
        return Err(AppError::InvalidInput(
            "at least one recipient is required to send".to_string(),
        ));
    }
    Ok(())
}

/// Validates an outgoing message and places it in `sent` or `drafts`.
pub fn into_payload(
    outgoing: OutgoingMessage,
    user: &CurrentUser,
    sender_name: Option<&str>,
    folders: &FolderMap,
    draft: bool,
) -> AppResult<CreateMessagePayload> {
    ensure_sendable(&outgoing, draft)?;

    let folder = if draft {
        FolderKind::Drafts
    } else {
        FolderKind::Sent
    };
    let folder_id = folders.id_for(folder);
    if folder_id.is_none() {
        warn!(%folder, user = %user.id, "no folder id known; store will place the message");
    }

    let from_name = sender_name
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| user.name.clone());

    Ok(CreateMessagePayload {
        user_id: user.id.clone(),
        folder_id,
        from_email: user.email.clone(),
        from_name,
        to: outgoing.to,
        cc: outgoing.cc,
        bcc: outgoing.bcc,
        subject: outgoing.subject,
        body: outgoing.body,
        in_reply_to: outgoing.in_reply_to,
        references: outgoing.references,
        thread_id: outgoing.thread_id,
        is_draft: draft,
    })
}

pub async fn submit<S>(store: &S, payload: &CreateMessagePayload) -> AppResult<CreatedMessage>
where
    S: MessageStore + ?Sized,
{
    let created = store.create_message(payload).await?;
    info!(id = %created.id, draft = payload.is_draft, "message stored");
    Ok(created)
}

/// Fields a composer is pre-filled with when a saved draft is reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftForm {
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
    pub references: Option<String>,
    pub thread_id: Option<String>,
}

impl DraftForm {
    pub fn into_outgoing(self) -> OutgoingMessage {
        OutgoingMessage {
            to: split_addresses(&self.to),
            cc: split_addresses(&self.cc),
            bcc: split_addresses(&self.bcc),
            subject: self.subject,
            body: self.body,
            in_reply_to: self.in_reply_to,
            references: self.references,
            thread_id: self.thread_id,
        }
    }
}

/// Reopens a saved draft and deletes the stored record, so that sending
/// creates a fresh message instead of editing the old one.
pub async fn reopen_draft<S>(store: &S, draft: &Message) -> AppResult<DraftForm>
where
    S: MessageStore + ?Sized,
{
    if !draft.is_draft {
        return Err(AppError::InvalidInput(format!(
            "message {} is not a draft",
            draft.id
        )));
    }

    let form = DraftForm {
        to: draft.to.join(", "),
        cc: draft.cc.join(", "),
        bcc: draft.bcc.join(", "),
        subject: draft.subject.clone(),
        body: normalize(draft.body.as_deref()),
        in_reply_to: draft.in_reply_to.clone(),
        references: draft.references.clone(),
        thread_id: draft.thread_id.clone(),
    };

    store.delete_message(&draft.id).await?;
    info!(id = %draft.id, "draft reopened and removed");
    Ok(form)
}

/// Splits a comma or semicolon separated address field.
pub fn split_addresses(input: &str) -> Vec<String> {
    dedupe_addresses(input.split([',', ';']), None)
}

fn resolve_recipients(source: &Message, mode: ReplyMode, me: &str) -> Vec<String> {
    match mode {
        ReplyMode::Reply if !same_address(&source.from_email, me) => {
            dedupe_addresses([source.from_email.as_str()], None)
        }
        ReplyMode::Reply => dedupe_addresses(source.to.iter().map(String::as_str), Some(me)),
        ReplyMode::ReplyAll => dedupe_addresses(
            std::iter::once(source.from_email.as_str())
                .chain(source.to.iter().map(String::as_str))
                .chain(source.cc.iter().map(String::as_str)),
            Some(me),
        ),
        ReplyMode::Forward => Vec::new(),
    }
}

fn dedupe_addresses<'a, I>(addresses: I, exclude: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for raw in addresses {
        let address = raw.trim();
        if address.is_empty() {
            continue;
        }
        if exclude.is_some_and(|me| same_address(address, me)) {
            continue;
        }
        if out.iter().any(|seen| same_address(seen, address)) {
            continue;
        }
        out.push(address.to_string());
    }
    out
}

fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn ensure_reply_subject(subject: &str) -> String {
    if subject.starts_with("Re:") {
        subject.to_string()
    } else {
        format!("Re: {subject}")
    }
}

/// The most specific identifier available to thread against.
fn threading_parent(source: &Message) -> Option<String> {
    let own = source.id.trim();
    if !own.is_empty() {
        return Some(own.to_string());
    }

    source
        .in_reply_to
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn merge_references<'a>(mut refs: Vec<&'a str>, parent_id: Option<&'a str>) -> Option<String> {
    if let Some(parent) = parent_id.map(str::trim).filter(|value| !value.is_empty()) {
        if refs.last() != Some(&parent) {
            refs.retain(|value| *value != parent);
            refs.push(parent);
        }
    }

    if refs.is_empty() {
        None
    } else {
        Some(refs.join(" "))
    }
}

pub fn format_quote_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %-I:%M %p").to_string()
}

/// The separator, attribution and quoted source appended to a reply.
///
/// Marker lines are bare text between `<br>`s so that `split_quoted` cuts
/// between elements and never inside one.
fn quoted_block(source: &Message, mode: ReplyMode) -> String {
    let date = format_quote_date(source.created_at);
    let sender = html_escape::encode_text(source.sender_label());
    let mut out = String::from("<hr>");

    if mode == ReplyMode::Forward {
        out.push_str(&format!(
            "{FORWARD_MARKER}<br>From: {sender} &lt;{}&gt;<br>Date: {date}<br>Subject: {}<br>To: {}<br><br>",
            html_escape::encode_text(&source.from_email),
            html_escape::encode_text(&source.subject),
            html_escape::encode_text(&source.to.join(", ")),
        ));
    }

    out.push_str(&format!("On {date}, {sender} wrote:<br>"));
    out.push_str(&format!(
        "<blockquote class=\"quoted\" style=\"{QUOTE_STYLE}\">{}</blockquote>",
        to_display_html(&normalize(source.body.as_deref()))
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_subject_is_not_double_prefixed() {
        assert_eq!(ensure_reply_subject("Hello"), "Re: Hello");
        assert_eq!(ensure_reply_subject("Re: Hello"), "Re: Hello");
        assert_eq!(ensure_reply_subject("RE: Hello"), "Re: RE: Hello");
    }

    #[test]
    fn references_do_not_repeat_trailing_parent() {
        assert_eq!(
            merge_references(vec!["<m1>", "<m2>"], Some("<m2>")).as_deref(),
            Some("<m1> <m2>")
        );
        assert_eq!(
            merge_references(vec!["<m1>"], Some("<m2>")).as_deref(),
            Some("<m1> <m2>")
        );
        assert_eq!(
            merge_references(vec!["<m2>", "<m1>"], Some("<m2>")).as_deref(),
            Some("<m1> <m2>")
        );
        assert_eq!(merge_references(Vec::new(), None), None);
    }

    #[test]
    fn dedupes_case_insensitively_and_drops_self() {
        let out = dedupe_addresses(
            ["Bob@x.com", " bob@x.com ", "", "alice@x.com", "dana@x.com"],
            Some("ALICE@x.com"),
        );
        assert_eq!(out, ["Bob@x.com", "dana@x.com"]);
    }

    #[test]
    fn splits_address_fields() {
        assert_eq!(
            split_addresses("a@x.com, b@x.com;  ,a@x.com"),
            ["a@x.com", "b@x.com"]
        );
    }

    #[test]
    fn renders_markdown_fragment() {
        assert_eq!(render_new_text("  "), "");
        assert_eq!(render_new_text("**hi**"), "<p><strong>hi</strong></p>");
    }

    #[test]
    fn formats_attribution_date() {
        let date = DateTime::parse_from_rfc3339("2024-01-01T15:04:00Z")
            .expect("valid date")
            .with_timezone(&Utc);
        assert_eq!(format_quote_date(date), "Jan 1, 2024, 3:04 PM");
    }
}

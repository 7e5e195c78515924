use crate::cli::ThreadArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::normalize::{normalize, to_plain_text};
use crate::mail::thread::{AttachmentState, ThreadEntry, assemble_thread};
use crate::output::text;

const PREVIEW_CHARS: usize = 120;

pub async fn run(ctx: &AppContext, args: ThreadArgs) -> AppResult<()> {
    let user = ctx.current_user()?;
    let mut view = assemble_thread(&ctx.client, &args.thread_id, &user.id).await?;
    if args.expand_all {
        for entry in &mut view.entries {
            entry.expanded = true;
        }
    }

    if !ctx.output.is_text() {
        let text = format!("{} messages", view.len());
        return ctx.output.emit(&text, &view);
    }

    if view.is_empty() {
        println!("0 messages");
        return Ok(());
    }

    for (index, entry) in view.entries.iter().enumerate() {
        print_entry(index, entry, args.quoted);
        if index + 1 < view.len() {
            println!();
        }
    }

    Ok(())
}

fn print_entry(index: usize, entry: &ThreadEntry, show_quoted: bool) {
    let message = &entry.message;
    let draft = if message.is_draft { " [draft]" } else { "" };
    let subject = if message.subject.trim().is_empty() {
        "(no subject)"
    } else {
        message.subject.as_str()
    };

    println!("{}. {}{}", index + 1, message.id, draft);
    println!("   from: {} <{}>", message.sender_label(), message.from_email);
    println!("   date: {}", message.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("   subject: {subject}");
    if !message.to.is_empty() {
        println!("   to: {}", message.to.join(", "));
    }
    if !message.cc.is_empty() {
        println!("   cc: {}", message.cc.join(", "));
    }

    for item in &entry.attachments {
        match &item.state {
            AttachmentState::Loaded(content) => println!(
                "   attachment: {} ({}, {} bytes)",
                item.attachment.filename,
                content.mime_type,
                content.data.len()
            ),
            AttachmentState::Failed { reason } => println!(
                "   attachment: {} (unavailable: {reason})",
                item.attachment.filename
            ),
        }
    }

    println!();
    let body = entry.rendered_body();
    if !entry.expanded {
        println!("   {}", format_preview(&body.main));
        return;
    }

    text::print_indented(&as_text(&body.main), 3);
    if !body.has_quoted() {
        return;
    }
    if show_quoted {
        println!();
        text::print_indented(&as_text(&body.quoted), 3);
    } else {
        println!("   [quoted history hidden]");
    }
}

fn as_text(html: &str) -> String {
    normalize(Some(&to_plain_text(html)))
}

fn format_preview(html: &str) -> String {
    let compact = as_text(html)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.is_empty() {
        return "(no preview)".to_string();
    }

    match compact.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &compact[..end]),
        None => compact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_preview_with_truncation() {
        let long = "word ".repeat(60);
        let preview = format_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn preview_flattens_markup() {
        assert_eq!(
            format_preview("<p>Hi&nbsp;there</p><p>0</p><div>bye</div>"),
            "Hi there bye"
        );
        assert_eq!(format_preview("<br>"), "(no preview)");
    }
}

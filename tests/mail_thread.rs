use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use threadmail::error::{AppError, AppResult};
use threadmail::mail::model::{
    Attachment, AttachmentContent, CreateMessagePayload, CreatedMessage, Message,
};
use threadmail::mail::thread::{AttachmentState, assemble_thread};
use threadmail::store::MessageStore;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid date")
        .with_timezone(&Utc)
}

fn message(id: &str, created_at: &str, body: &str) -> Message {
    Message {
        id: id.to_string(),
        thread_id: Some("t-1".to_string()),
        from_email: "bob@x.com".to_string(),
        from_name: Some("Bob".to_string()),
        subject: "Plans".to_string(),
        body: Some(body.to_string()),
        to: vec!["alice@x.com".to_string()],
        cc: vec![],
        bcc: vec![],
        in_reply_to: None,
        references: None,
        created_at: at(created_at),
        is_read: false,
        is_starred: false,
        is_draft: false,
        attachments: vec![],
    }
}

fn attachment(id: &str, filename: &str, content_id: Option<&str>) -> Attachment {
    Attachment {
        id: id.to_string(),
        filename: filename.to_string(),
        mime_type: None,
        size: 4,
        content_id: content_id.map(ToOwned::to_owned),
    }
}

#[derive(Default)]
struct FakeStore {
    thread: Option<Vec<Message>>,
    attachments: HashMap<(String, String), AttachmentContent>,
    attachment_calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessageStore for FakeStore {
    async fn get_thread(&self, thread_id: &str, _user_id: &str) -> AppResult<Vec<Message>> {
        self.thread
            .clone()
            .ok_or_else(|| AppError::Api(format!("thread {thread_id} unavailable")))
    }

    async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentContent> {
        let key = (message_id.to_string(), attachment_id.to_string());
        self.attachment_calls.lock().expect("lock").push(key.clone());
        self.attachments
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("attachment {attachment_id}")))
    }

    async fn create_message(&self, _payload: &CreateMessagePayload) -> AppResult<CreatedMessage> {
        Err(AppError::Api("read only".to_string()))
    }

    async fn delete_message(&self, _message_id: &str) -> AppResult<()> {
        Err(AppError::Api("read only".to_string()))
    }
}

#[tokio::test]
async fn orders_oldest_first_and_expands_newest() {
    let store = FakeStore {
        thread: Some(vec![
            message("m3", "2024-01-03T09:00:00Z", "third"),
            message("m1", "2024-01-01T09:00:00Z", "first"),
            message("m2", "2024-01-02T09:00:00Z", "second"),
        ]),
        ..FakeStore::default()
    };

    let view = assemble_thread(&store, "t-1", "u-1").await.expect("thread");
    let ids = view
        .entries
        .iter()
        .map(|entry| entry.message.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["m1", "m2", "m3"]);

    let expanded = view.entries.iter().map(|e| e.expanded).collect::<Vec<_>>();
    assert_eq!(expanded, [false, false, true]);
    assert!(store.attachment_calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn empty_thread_has_no_expanded_entry() {
    let store = FakeStore {
        thread: Some(Vec::new()),
        ..FakeStore::default()
    };

    let view = assemble_thread(&store, "t-1", "u-1").await.expect("thread");
    assert!(view.is_empty());
    assert!(view.entries.iter().all(|entry| !entry.expanded));
}

#[tokio::test]
async fn thread_fetch_failure_is_returned() {
    let store = FakeStore::default();
    let result = assemble_thread(&store, "t-1", "u-1").await;
    assert!(matches!(result, Err(AppError::Api(_))));
}

#[tokio::test]
async fn attachment_failures_stay_on_the_attachment() {
    let mut first = message("m1", "2024-01-01T09:00:00Z", "<p>see logo <img src=\"cid:logo@x\"></p>");
    first.attachments = vec![
        attachment("a1", "logo.png", Some("<logo@x>")),
        attachment("a2", "missing.pdf", None),
    ];
    let mut second = message("m2", "2024-01-02T09:00:00Z", "<img src=\"cid:gone@x\">");
    second.attachments = vec![attachment("a3", "gone.png", Some("gone@x"))];

    let mut attachments = HashMap::new();
    attachments.insert(
        ("m1".to_string(), "a1".to_string()),
        AttachmentContent {
            filename: "logo.png".to_string(),
            mime_type: "image/png".to_string(),
            data: b"png!".to_vec(),
        },
    );

    let store = FakeStore {
        thread: Some(vec![second, first]),
        attachments,
        ..FakeStore::default()
    };

    let view = assemble_thread(&store, "t-1", "u-1").await.expect("thread");
    assert_eq!(view.len(), 2);

    let first = &view.entries[0];
    assert_eq!(first.attachments.len(), 2);
    assert!(matches!(first.attachments[0].state, AttachmentState::Loaded(_)));
    assert!(matches!(
        first.attachments[1].state,
        AttachmentState::Failed { .. }
    ));
    assert!(first.attachments[1].content().is_none());
    assert_eq!(
        first.message.body.as_deref(),
        Some("<p>see logo <img src=\"data:image/png;base64,cG5nIQ==\"></p>")
    );

    let second = &view.entries[1];
    assert_eq!(second.message.body.as_deref(), Some("<img src=\"cid:gone@x\">"));
    assert!(second.expanded);

    let calls = store.attachment_calls.lock().expect("lock");
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], ("m1".to_string(), "a1".to_string()));
}

#[tokio::test]
async fn rendered_body_splits_quoted_history() {
    let html = message(
        "m1",
        "2024-01-01T09:00:00Z",
        "<p>Sure.</p><blockquote>earlier</blockquote>",
    );
    let plain = message(
        "m2",
        "2024-01-02T09:00:00Z",
        "Thanks\r\n0\r\nOn Jan 1, 2024, Bob wrote:\r\n> earlier & more",
    );
    let store = FakeStore {
        thread: Some(vec![html, plain]),
        ..FakeStore::default()
    };

    let view = assemble_thread(&store, "t-1", "u-1").await.expect("thread");

    let first = view.entries[0].rendered_body();
    assert_eq!(first.main, "<p>Sure.</p>");
    assert_eq!(first.quoted, "<blockquote>earlier</blockquote>");

    let second = view.entries[1].rendered_body();
    assert_eq!(second.main, "Thanks<br>");
    assert_eq!(second.quoted, "On Jan 1, 2024, Bob wrote:<br>&gt; earlier &amp; more");
}

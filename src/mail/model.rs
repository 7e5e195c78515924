use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A stored message as returned by the message store.
///
/// Messages are append-only once sent. Only the flag fields and the folder
/// placement change after creation, and neither is modelled as mutable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    pub from_email: String,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub references: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// The conversation key. A standalone message is its own thread.
    pub fn thread_key(&self) -> &str {
        self.thread_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.id)
    }

    /// Ancestor identifiers in root-to-parent order.
    pub fn reference_ids(&self) -> Vec<&str> {
        self.references
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .collect()
    }

    /// Display name when present, otherwise the bare address.
    pub fn sender_label(&self) -> &str {
        self.from_name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.from_email)
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

/// Attachment metadata carried on a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_id: Option<String>,
}

impl Attachment {
    pub fn is_inline(&self) -> bool {
        self.content_id
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }
}

/// Decoded attachment bytes fetched from attachment storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentContent {
    pub filename: String,
    pub mime_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// The result of composing a reply, forward or new message, before it is
/// placed in a folder and handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
    pub references: Option<String>,
    pub thread_id: Option<String>,
}

impl OutgoingMessage {
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

/// Body of a `createMessage` store call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMessagePayload {
    pub user_id: String,
    pub folder_id: Option<i64>,
    pub from_email: String,
    pub from_name: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
    pub references: Option<String>,
    pub thread_id: Option<String>,
    pub is_draft: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedMessage {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Inbox,
    Sent,
    Drafts,
    Trash,
    Spam,
    Archive,
}

impl FolderKind {
    pub const ALL: [FolderKind; 6] = [
        FolderKind::Inbox,
        FolderKind::Sent,
        FolderKind::Drafts,
        FolderKind::Trash,
        FolderKind::Spam,
        FolderKind::Archive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FolderKind::Inbox => "inbox",
            FolderKind::Sent => "sent",
            FolderKind::Drafts => "drafts",
            FolderKind::Trash => "trash",
            FolderKind::Spam => "spam",
            FolderKind::Archive => "archive",
        }
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        FolderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AppError::InvalidInput(format!("unknown folder `{needle}`")))
    }
}

/// Symbolic folder name to numeric folder id, for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderMap(BTreeMap<FolderKind, i64>);

impl FolderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from raw `(name, id)` rows. Custom folders are skipped.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut map = Self::new();
        for (name, id) in rows {
            if let Ok(kind) = name.parse::<FolderKind>() {
                map.0.entry(kind).or_insert(id);
            }
        }
        map
    }

    pub fn id_for(&self, kind: FolderKind) -> Option<i64> {
        self.0.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FolderKind, i64)> + '_ {
        self.0.iter().map(|(kind, id)| (*kind, *id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        Message {
            id: "<m1@example.com>".to_string(),
            thread_id: None,
            from_email: "bob@example.com".to_string(),
            from_name: Some("  ".to_string()),
            subject: "Hello".to_string(),
            body: None,
            to: vec![],
            cc: vec![],
            bcc: vec![],
            in_reply_to: None,
            references: Some(" <a>  <b> ".to_string()),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            is_read: false,
            is_starred: false,
            is_draft: false,
            attachments: vec![],
        }
    }

    #[test]
    fn standalone_message_is_its_own_thread() {
        let mut message = sample();
        assert_eq!(message.thread_key(), "<m1@example.com>");

        message.thread_id = Some("t-9".to_string());
        assert_eq!(message.thread_key(), "t-9");
    }

    #[test]
    fn blank_display_name_falls_back_to_address() {
        assert_eq!(sample().sender_label(), "bob@example.com");
    }

    #[test]
    fn splits_references_on_whitespace() {
        assert_eq!(sample().reference_ids(), ["<a>", "<b>"]);
    }

    #[test]
    fn folder_map_skips_custom_folders() {
        let map = FolderMap::from_rows([("Inbox", 1), ("receipts", 7), ("sent", 2)]);
        assert_eq!(map.id_for(FolderKind::Inbox), Some(1));
        assert_eq!(map.id_for(FolderKind::Sent), Some(2));
        assert_eq!(map.id_for(FolderKind::Drafts), None);
        assert_eq!(map.iter().count(), 2);
    }

    #[test]
    fn deserializes_sparse_store_rows() {
        let message: Message = serde_json::from_str(
            r#"{"id":"42","from_email":"a@x.com","created_at":"2024-01-01T10:00:00Z"}"#,
        )
        .expect("sparse row should parse");
        assert_eq!(message.thread_key(), "42");
        assert!(message.to.is_empty());
        assert!(!message.has_attachments());
    }
}

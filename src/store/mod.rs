//! Collaborator interfaces consumed by the composer and thread assembler.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::mail::model::{
    AttachmentContent, CreateMessagePayload, CreatedMessage, FolderMap, Message,
};

/// Message storage: thread reads, attachment reads and message creation.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages carrying `thread_id` that `user_id` can see, in store order.
    async fn get_thread(&self, thread_id: &str, user_id: &str) -> AppResult<Vec<Message>>;

    /// Full content of one attachment.
    async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentContent>;

    async fn create_message(&self, payload: &CreateMessagePayload) -> AppResult<CreatedMessage>;

    /// Permanently removes a message record.
    async fn delete_message(&self, message_id: &str) -> AppResult<()>;
}

/// Resolves symbolic folder names to a user's numeric folder ids.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn folder_map(&self, user_id: &str) -> AppResult<FolderMap>;
}

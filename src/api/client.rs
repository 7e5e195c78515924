use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::mail::model::{
    AttachmentContent, CreateMessagePayload, CreatedMessage, FolderMap, Message,
};
use crate::store::{FolderStore, MessageStore};

use super::folders;
use super::messages;

/// HTTP implementation of the message and folder stores.
#[derive(Debug, Clone)]
pub struct MailApiClient {
    http: Client,
    base_url: Url,
}

impl MailApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(String, String)]>,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "GET");
        let mut request = self.http.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.parse_json_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        self.parse_json_response(response).await
    }

    async fn delete(&self, endpoint: &str) -> AppResult<()> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }

    async fn parse_json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

#[async_trait]
impl MessageStore for MailApiClient {
    async fn get_thread(&self, thread_id: &str, user_id: &str) -> AppResult<Vec<Message>> {
        let endpoint = messages::thread_endpoint(thread_id);
        let query = messages::user_query(user_id);
        let envelope: ThreadEnvelope = self.get_json(&endpoint, Some(&query)).await?;
        Ok(envelope.data)
    }

    async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentContent> {
        let endpoint = messages::attachment_endpoint(message_id, attachment_id);
        let envelope: AttachmentEnvelope = self.get_json(&endpoint, None).await?;
        envelope.into_content()
    }

    async fn create_message(&self, payload: &CreateMessagePayload) -> AppResult<CreatedMessage> {
        let envelope: CreatedEnvelope = self
            .post_json(messages::create_endpoint(), payload)
            .await?;
        Ok(CreatedMessage { id: envelope.id })
    }

    async fn delete_message(&self, message_id: &str) -> AppResult<()> {
        self.delete(&messages::message_endpoint(message_id)).await
    }
}

#[async_trait]
impl FolderStore for MailApiClient {
    async fn folder_map(&self, user_id: &str) -> AppResult<FolderMap> {
        let query = messages::user_query(user_id);
        let envelope: FolderListEnvelope = self
            .get_json(folders::list_folders_endpoint(), Some(&query))
            .await?;
        Ok(envelope.into_map())
    }
}

#[derive(Debug, Deserialize)]
struct ThreadEnvelope {
    data: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct AttachmentEnvelope {
    filename: String,
    #[serde(default)]
    mime_type: Option<String>,
    content: String,
}

impl AttachmentEnvelope {
    fn into_content(self) -> AppResult<AttachmentContent> {
        let compact: String = self
            .content
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect();
        let data = STANDARD.decode(compact)?;
        let mime_type = self
            .mime_type
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&self.filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        Ok(AttachmentContent {
            filename: self.filename,
            mime_type,
            data,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FolderListEnvelope {
    data: Vec<FolderRow>,
}

#[derive(Debug, Deserialize)]
struct FolderRow {
    id: i64,
    name: String,
}

impl FolderListEnvelope {
    fn into_map(self) -> FolderMap {
        FolderMap::from_rows(self.data.iter().map(|row| (row.name.as_str(), row.id)))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::NOT_FOUND {
        return AppError::NotFound(message);
    }

    AppError::Api(format!("store request failed ({status}): {message}"))
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok()?;
    envelope
        .error
        .or(envelope.message)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn thread_endpoint(thread_id: &str) -> String {
    format!("/api/threads/{}", encode_segment(thread_id))
}

pub fn attachment_endpoint(message_id: &str, attachment_id: &str) -> String {
    format!(
        "/api/messages/{}/attachments/{}",
        encode_segment(message_id),
        encode_segment(attachment_id)
    )
}

pub fn create_endpoint() -> &'static str {
    "/api/messages"
}

pub fn message_endpoint(message_id: &str) -> String {
    format!("/api/messages/{}", encode_segment(message_id))
}

pub fn user_query(user_id: &str) -> Vec<(String, String)> {
    vec![("user_id".to_string(), user_id.to_string())]
}

/// Message ids look like `<local@host>`, so they are percent-encoded.
fn encode_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

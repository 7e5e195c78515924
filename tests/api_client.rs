mod error {
    pub use threadmail::error::*;
}

mod mail {
    pub mod model {
        pub use threadmail::mail::model::*;
    }
}

mod store {
    pub use threadmail::store::*;
}

mod folders {
    pub use threadmail::api::folders::*;
}

mod messages {
    pub use threadmail::api::messages::*;
}

mod client_under_test {
    #![allow(dead_code)]

    include!("../src/api/client.rs");

    use crate::mail::model::FolderKind;

    #[test]
    fn unwraps_thread_envelope() {
        let envelope: ThreadEnvelope = serde_json::from_str(
            r#"{"data":[{"id":"m1","thread_id":"t1","from_email":"bob@x.com","subject":"Hi","body":"0","to":["alice@x.com"],"created_at":"2024-01-01T10:00:00Z","attachments":[{"id":"a1","filename":"x.pdf","size":12}]}]}"#,
        )
        .expect("envelope should parse");

        assert_eq!(envelope.data.len(), 1);
        let message = &envelope.data[0];
        assert_eq!(message.thread_key(), "t1");
        assert_eq!(message.attachments[0].filename, "x.pdf");
        assert_eq!(message.attachments[0].content_id, None);
    }

    #[test]
    fn decodes_attachment_content_and_guesses_mime() {
        let envelope = AttachmentEnvelope {
            filename: "notes.txt".to_string(),
            mime_type: None,
            content: "aGVs\nbG8=".to_string(),
        };

        let content = envelope.into_content().expect("content should decode");
        assert_eq!(content.data, b"hello");
        assert_eq!(content.mime_type, "text/plain");
    }

    #[test]
    fn keeps_declared_mime_type() {
        let envelope = AttachmentEnvelope {
            filename: "blob".to_string(),
            mime_type: Some("image/png".to_string()),
            content: String::new(),
        };

        let content = envelope.into_content().expect("content should decode");
        assert!(content.data.is_empty());
        assert_eq!(content.mime_type, "image/png");
    }

    #[test]
    fn rejects_invalid_base64() {
        let envelope = AttachmentEnvelope {
            filename: "x.bin".to_string(),
            mime_type: None,
            content: "***".to_string(),
        };

        assert!(matches!(envelope.into_content(), Err(AppError::Base64(_))));
    }

    #[test]
    fn builds_folder_map_from_rows() {
        let envelope: FolderListEnvelope = serde_json::from_str(
            r#"{"data":[{"id":11,"name":"Inbox"},{"id":12,"name":"Sent"},{"id":13,"name":"Drafts"},{"id":99,"name":"Receipts"}]}"#,
        )
        .expect("envelope should parse");

        let map = envelope.into_map();
        assert_eq!(map.id_for(FolderKind::Inbox), Some(11));
        assert_eq!(map.id_for(FolderKind::Drafts), Some(13));
        assert_eq!(map.id_for(FolderKind::Trash), None);
    }

    #[test]
    fn reads_message_field_from_error_body() {
        let error = map_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":"subject too long"}"#,
        );
        match error {
            AppError::Api(message) => assert!(message.contains("subject too long")),
            other => panic!("expected api error, got {other:?}"),
        }
    }
}

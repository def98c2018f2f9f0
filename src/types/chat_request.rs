use serde::Serialize;

use crate::types::ImageAttachment;

/// Parameters for one chat send.
///
/// Serializes to the backend's JSON body. The attachment is deliberately not
/// part of the JSON shape: its presence switches the transport to a multipart
/// upload with `message`, `session_id`, and `image` fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// The user's message text.
    pub message: String,

    /// Session to continue; `None` asks the backend to create one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Staged image upload.
    #[serde(skip)]
    pub attachment: Option<ImageAttachment>,
}

impl ChatRequest {
    /// Create a new `ChatRequest` for the given message text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            attachment: None,
        }
    }

    /// Continue an existing session.
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Ride an image along with the message.
    pub fn with_attachment(mut self, attachment: Option<ImageAttachment>) -> Self {
        self.attachment = attachment;
        self
    }

    /// Whether an attachment is staged (and multipart encoding applies).
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, to_value};

    use super::*;

    #[test]
    fn json_body_without_session() {
        let request = ChatRequest::new("What causes migraines?");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"message": "What causes migraines?"})
        );
    }

    #[test]
    fn json_body_with_session() {
        let request =
            ChatRequest::new("And treatments?").with_session_id(Some("s-42".to_string()));
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"message": "And treatments?", "session_id": "s-42"})
        );
    }

    #[test]
    fn attachment_never_rides_in_json() {
        let request = ChatRequest::new("see attached").with_attachment(Some(
            ImageAttachment::new("rash.png", "image/png", vec![1]),
        ));
        assert!(request.has_attachment());
        let json = to_value(&request).unwrap();
        assert!(json.get("attachment").is_none());
    }
}

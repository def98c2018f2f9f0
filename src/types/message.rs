use serde::{Deserialize, Serialize};

use crate::types::ImageAttachment;

/// Who produced a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The human user.
    User,

    /// The assistant model.
    Model,

    /// Backend-injected text (disclaimers and the like).
    System,
}

/// A single entry in a transcript.
///
/// Messages are immutable once appended; transcript order is arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message.
    pub role: MessageRole,

    /// The message text. History endpoints spell this field `content`.
    #[serde(rename = "content")]
    pub text: String,

    /// Image the user attached, if any. Never present on backend messages
    /// and never serialized.
    #[serde(skip)]
    pub attachment: Option<ImageAttachment>,
}

/// Ordered messages for one conversation.
pub type Transcript = Vec<Message>;

impl Message {
    /// Create a new `Message` with the given role and text.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            attachment: None,
        }
    }

    /// Create a new user `Message`.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create a new model `Message`.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, text)
    }

    /// Attach (or detach) an image.
    pub fn with_attachment(mut self, attachment: Option<ImageAttachment>) -> Self {
        self.attachment = attachment;
        self
    }
}

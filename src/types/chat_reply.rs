use serde::Deserialize;

use crate::error::{Error, Result};

/// Decoded result of one chat send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// The assistant's reply text, or the synthesized notice when the
    /// request was safety-blocked.
    pub text: String,

    /// Session id the response rode in on, if the backend reported one.
    pub session_id: Option<String>,

    /// True when the backend declined to answer. Not a failure: the notice
    /// in `text` is meant for direct display.
    pub safety_blocked: bool,
}

impl ChatReply {
    /// Create an ordinary answer reply.
    pub fn answer(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            session_id,
            safety_blocked: false,
        }
    }

    /// Create a safety-block reply with a synthesized notice for `reason`.
    pub fn safety_block(reason: &str) -> Self {
        Self {
            text: format!(
                "I can't answer that. The request was declined by the assistant's \
                 safety filters (reason: {reason}). Please rephrase your question, \
                 and seek immediate medical attention for urgent concerns."
            ),
            session_id: None,
            safety_blocked: true,
        }
    }
}

/// Wire shape of a successful chat response.
///
/// The proxy returns `{"response": …, "session_id"?: …}`. A pass-through
/// deployment forwards the provider's native body unmodified, either
/// `{"candidates": […]}` or `{"promptFeedback": {"blockReason": …}}`. The
/// proxy shape is tried first; the provider shape accepts any object, so it
/// must stay last.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatResponseBody {
    /// The proxy's own response shape.
    Proxy(ProxyReply),

    /// The provider-native response shape, forwarded verbatim.
    Provider(ProviderReply),
}

/// Proxy response: `{"response": …, "session_id"?: …}`.
#[derive(Debug, Deserialize)]
pub struct ProxyReply {
    /// The assistant's reply text.
    pub response: String,

    /// Session id, present when the backend persists history.
    pub session_id: Option<String>,
}

/// Provider-native response body.
#[derive(Debug, Deserialize)]
pub struct ProviderReply {
    /// Generated candidates; the first one carries the reply.
    pub candidates: Option<Vec<Candidate>>,

    /// Present when the provider declined to answer.
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// The candidate's content.
    pub content: Option<CandidateContent>,
}

/// Content of a candidate: an ordered list of parts.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// The content parts; text lives in the first text-bearing part.
    pub parts: Vec<CandidatePart>,
}

/// One content part.
#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    /// Text payload, when this part carries text.
    pub text: Option<String>,
}

/// Provider feedback on a declined prompt.
#[derive(Debug, Deserialize)]
pub struct PromptFeedback {
    /// Why the prompt was declined.
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

impl ChatResponseBody {
    /// Decode the wire body into a [`ChatReply`].
    ///
    /// A block reason wins over any candidate text. A provider body with
    /// neither candidate text nor a block reason is a serialization error:
    /// the response parsed as JSON but is missing the expected fields.
    pub fn into_reply(self) -> Result<ChatReply> {
        match self {
            ChatResponseBody::Proxy(proxy) => {
                Ok(ChatReply::answer(proxy.response, proxy.session_id))
            }
            ChatResponseBody::Provider(provider) => {
                if let Some(feedback) = &provider.prompt_feedback
                    && let Some(reason) = &feedback.block_reason
                {
                    return Ok(ChatReply::safety_block(reason));
                }
                let text = provider
                    .candidates
                    .into_iter()
                    .flatten()
                    .next()
                    .and_then(|candidate| candidate.content)
                    .and_then(|content| {
                        content.parts.into_iter().find_map(|part| part.text)
                    });
                match text {
                    Some(text) => Ok(ChatReply::answer(text, None)),
                    None => Err(Error::serialization(
                        "chat response carried neither reply text nor a block reason",
                        None,
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_value, json};

    use super::*;

    fn decode(value: serde_json::Value) -> Result<ChatReply> {
        from_value::<ChatResponseBody>(value)
            .map_err(Error::from)
            .and_then(ChatResponseBody::into_reply)
    }

    #[test]
    fn proxy_reply_with_session() {
        let reply = decode(json!({
            "response": "Drink fluids and rest.",
            "session_id": "s-7"
        }))
        .unwrap();
        assert_eq!(reply.text, "Drink fluids and rest.");
        assert_eq!(reply.session_id.as_deref(), Some("s-7"));
        assert!(!reply.safety_blocked);
    }

    #[test]
    fn proxy_reply_without_session() {
        let reply = decode(json!({"response": "Hello!"})).unwrap();
        assert!(reply.session_id.is_none());
    }

    #[test]
    fn provider_reply_extracts_first_text_part() {
        let reply = decode(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Paracetamol helps."}]}}
            ]
        }))
        .unwrap();
        assert_eq!(reply.text, "Paracetamol helps.");
        assert!(reply.session_id.is_none());
        assert!(!reply.safety_blocked);
    }

    #[test]
    fn blocked_reply_is_not_an_error() {
        let reply = decode(json!({
            "promptFeedback": {
                "blockReason": "SAFETY",
                "safetyRatings": []
            }
        }))
        .unwrap();
        assert!(reply.safety_blocked);
        assert!(reply.text.contains("SAFETY"));
    }

    #[test]
    fn block_reason_wins_over_candidates() {
        let reply = decode(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "OTHER"}
        }))
        .unwrap();
        assert!(reply.safety_blocked);
    }

    #[test]
    fn empty_object_is_missing_fields() {
        let err = decode(json!({})).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn empty_candidates_is_missing_fields() {
        let err = decode(json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }
}

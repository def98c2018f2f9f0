//! Data model for the chat client.

mod attachment;
mod chat_reply;
mod chat_request;
mod message;
mod session_detail;
mod session_summary;

pub use attachment::ImageAttachment;
pub use chat_reply::{
    Candidate, CandidateContent, CandidatePart, ChatReply, ChatResponseBody, PromptFeedback,
    ProviderReply, ProxyReply,
};
pub use chat_request::ChatRequest;
pub use message::{Message, MessageRole, Transcript};
pub use session_detail::SessionDetail;
pub use session_summary::SessionSummary;

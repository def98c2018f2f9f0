//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the active
//! transcript and orchestrates the send/receive cycle against a backend.

use crate::chat::render::Renderer;
use crate::client::Backend;
use crate::error::{Error, Result};
use crate::history::SessionStore;
use crate::markup;
use crate::types::{ChatRequest, ImageAttachment, Message, SessionSummary, Transcript};

/// What became of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty submission; nothing was sent and nothing changed.
    Ignored,

    /// The assistant answered.
    Answered,

    /// The backend declined to answer; the explanatory notice was appended
    /// to the transcript like a normal reply.
    SafetyBlocked,
}

/// A chat session that manages conversation state and backend interaction.
///
/// The session owns the active transcript (at most one is active at a
/// time), the session store, and at most one staged image attachment.
/// Exactly one send may be in flight at a time.
pub struct ChatSession<B: Backend> {
    client: B,
    transcript: Transcript,
    store: SessionStore,
    pending_attachment: Option<ImageAttachment>,
    in_flight: bool,
}

impl<B: Backend> ChatSession<B> {
    /// Creates a new chat session over the given backend.
    pub fn new(client: B) -> Self {
        Self {
            client,
            transcript: Vec::new(),
            store: SessionStore::new(),
            pending_attachment: None,
            in_flight: false,
        }
    }

    /// Sends a user message and renders the outcome.
    ///
    /// This method:
    /// 1. Ignores empty submissions (no text and no staged attachment)
    ///    silently.
    /// 2. Appends the user message to the transcript optimistically, before
    ///    the network call resolves.
    /// 3. Shows the loading placeholder for the duration of the request and
    ///    removes it on every outcome.
    /// 4. Rolls the optimistic append back if the send fails, so client and
    ///    server history stay in step; the rest of the transcript is left
    ///    untouched.
    /// 5. Appends the reply and adopts a newly reported session id on
    ///    success. A safety block takes the same path with
    ///    [`SendOutcome::SafetyBlocked`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails; the error message is
    /// suitable for direct display.
    pub async fn send(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<SendOutcome> {
        if self.in_flight {
            return Err(Error::validation("a send is already in flight", None));
        }

        let text = user_input.trim();
        if text.is_empty() && self.pending_attachment.is_none() {
            return Ok(SendOutcome::Ignored);
        }

        let attachment = self.pending_attachment.take();
        let previous_len = self.transcript.len();
        self.transcript
            .push(Message::user(text).with_attachment(attachment.clone()));

        let request = ChatRequest::new(text)
            .with_session_id(self.store.active_id().map(String::from))
            .with_attachment(attachment.clone());

        self.in_flight = true;
        renderer.begin_loading();
        let outcome = self.client.send_chat(&request).await;
        renderer.end_loading();
        self.in_flight = false;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                // No server-confirmed copy of the message exists yet; drop
                // the optimistic append and restore the staged attachment.
                self.transcript.truncate(previous_len);
                self.pending_attachment = attachment;
                return Err(err);
            }
        };

        self.transcript.push(Message::model(&reply.text));
        renderer.print_reply(&markup::format(&reply.text));

        if let Some(id) = reply.session_id.clone()
            && let Err(err) = self.store.adopt(&self.client, id).await
        {
            // The reply already landed; a listing failure is worth a note
            // but must not look like a failed send.
            renderer.print_error(&format!("failed to refresh session list: {err}"));
        }

        if reply.safety_blocked {
            Ok(SendOutcome::SafetyBlocked)
        } else {
            Ok(SendOutcome::Answered)
        }
    }

    /// Starts a fresh, empty session.
    pub fn new_session(&mut self) {
        self.transcript.clear();
        self.store.reset();
    }

    /// Fetches the session listing fresh from the backend.
    pub async fn refresh_sessions(&mut self) -> Result<Vec<SessionSummary>> {
        Ok(self.store.refresh(&self.client).await?.to_vec())
    }

    /// Loads a session's history, replacing the active transcript wholesale.
    ///
    /// Returns the number of messages loaded.
    pub async fn load_session(&mut self, id: &str) -> Result<usize> {
        let detail = self.store.load(&self.client, id).await?;
        self.transcript = detail.messages;
        Ok(self.transcript.len())
    }

    /// Deletes a session.
    ///
    /// Deleting the active session falls back to a fresh, empty one;
    /// deleting an id the backend no longer knows is not an error. Returns
    /// true when the active session was the one deleted.
    pub async fn delete_session(&mut self, id: &str) -> Result<bool> {
        let was_active = self.store.delete(&self.client, id).await?;
        if was_active {
            self.transcript.clear();
        }
        Ok(was_active)
    }

    /// Stages an image to ride along with the next message.
    pub fn attach(&mut self, attachment: ImageAttachment) {
        self.pending_attachment = Some(attachment);
    }

    /// Drops the staged attachment. Returns true if one was staged.
    pub fn clear_attachment(&mut self) -> bool {
        self.pending_attachment.take().is_some()
    }

    /// The staged attachment, if any.
    pub fn pending_attachment(&self) -> Option<&ImageAttachment> {
        self.pending_attachment.as_ref()
    }

    /// The active session id, if one has been established.
    pub fn active_session(&self) -> Option<&str> {
        self.store.active_id()
    }

    /// The active transcript.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}

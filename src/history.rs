//! Session tracking over the backend's history endpoints.
//!
//! [`SessionStore`] owns the client's view of which conversation is active
//! and the most recently fetched summary listing. It never caches beyond one
//! refresh: every listing shown to the user is fetched fresh from the
//! backend.

use crate::client::Backend;
use crate::error::Result;
use crate::observability::SESSION_ADOPTIONS;
use crate::types::{SessionDetail, SessionSummary};

/// Tracks the active conversation id and the last-fetched session listing.
///
/// The store holds no transport of its own; callers pass the backend into
/// each operation.
#[derive(Debug, Default)]
pub struct SessionStore {
    active: Option<String>,
    summaries: Vec<SessionSummary>,
}

impl SessionStore {
    /// Creates an empty store with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session id, if a session has been established.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The summaries fetched by the most recent refresh.
    pub fn summaries(&self) -> &[SessionSummary] {
        &self.summaries
    }

    /// Fetches the session listing fresh from the backend.
    ///
    /// The backend orders summaries most recent first; the store preserves
    /// wire order and never re-sorts.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) -> Result<&[SessionSummary]> {
        self.summaries = backend.list_sessions().await?;
        Ok(&self.summaries)
    }

    /// Loads one session's full history and marks it active.
    pub async fn load<B: Backend>(&mut self, backend: &B, id: &str) -> Result<SessionDetail> {
        let detail = backend.fetch_session(id).await?;
        self.active = Some(id.to_string());
        Ok(detail)
    }

    /// Deletes a session.
    ///
    /// A backend miss counts as success: the session is gone either way.
    /// Returns true when the deleted id was the active session, in which
    /// case the caller must fall back to a fresh, empty session.
    pub async fn delete<B: Backend>(&mut self, backend: &B, id: &str) -> Result<bool> {
        match backend.delete_session(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        self.summaries.retain(|summary| summary.id != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Adopts a session id reported by a send response.
    ///
    /// An id that differs from the active one means the backend created a
    /// session for us: it becomes active and the summary listing is
    /// refreshed, exactly once. Returns true when an adoption happened.
    pub async fn adopt<B: Backend>(&mut self, backend: &B, id: String) -> Result<bool> {
        if self.active.as_deref() == Some(id.as_str()) {
            return Ok(false);
        }
        self.active = Some(id);
        SESSION_ADOPTIONS.click();
        self.refresh(backend).await?;
        Ok(true)
    }

    /// Forgets the active session. The next successful send establishes a
    /// new one from the id the backend returns.
    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;
    use crate::types::{ChatReply, ChatRequest, Message};

    /// Backend double serving a fixed session listing.
    #[derive(Default)]
    struct StubBackend {
        sessions: Vec<SessionSummary>,
        delete_misses: bool,
        list_calls: AtomicU32,
    }

    impl StubBackend {
        fn with_sessions(sessions: Vec<SessionSummary>) -> Self {
            Self {
                sessions,
                ..Self::default()
            }
        }

        fn list_calls(&self) -> u32 {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    fn summary(id: &str, title: &str) -> SessionSummary {
        SessionSummary {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[async_trait]
    impl Backend for StubBackend {
        async fn send_chat(&self, _request: &ChatRequest) -> Result<ChatReply> {
            Err(Error::unknown("send_chat not expected in this test"))
        }

        async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.sessions.clone())
        }

        async fn fetch_session(&self, id: &str) -> Result<SessionDetail> {
            if self.sessions.iter().any(|summary| summary.id == id) {
                Ok(SessionDetail {
                    messages: vec![Message::user("hi"), Message::model("hello")],
                })
            } else {
                Err(Error::not_found(
                    format!("no session with id {id}"),
                    Some("session".to_string()),
                    Some(id.to_string()),
                ))
            }
        }

        async fn delete_session(&self, id: &str) -> Result<()> {
            if self.delete_misses {
                Err(Error::not_found(
                    format!("no session with id {id}"),
                    Some("session".to_string()),
                    Some(id.to_string()),
                ))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn refresh_always_fetches_fresh() {
        let backend = StubBackend::with_sessions(vec![summary("s-1", "First visit")]);
        let mut store = SessionStore::new();

        store.refresh(&backend).await.unwrap();
        store.refresh(&backend).await.unwrap();
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(store.summaries().len(), 1);
    }

    #[tokio::test]
    async fn load_marks_session_active() {
        let backend = StubBackend::with_sessions(vec![summary("s-1", "First visit")]);
        let mut store = SessionStore::new();

        let detail = store.load(&backend, "s-1").await.unwrap();
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(store.active_id(), Some("s-1"));
    }

    #[tokio::test]
    async fn load_miss_propagates_and_leaves_active_alone() {
        let backend = StubBackend::default();
        let mut store = SessionStore::new();

        let err = store.load(&backend, "missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.active_id().is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_session_is_success() {
        let backend = StubBackend {
            delete_misses: true,
            ..StubBackend::default()
        };
        let mut store = SessionStore::new();

        let was_active = store.delete(&backend, "gone").await.unwrap();
        assert!(!was_active);
    }

    #[tokio::test]
    async fn delete_of_active_session_reports_fallback() {
        let backend = StubBackend::with_sessions(vec![summary("s-1", "First visit")]);
        let mut store = SessionStore::new();

        store.load(&backend, "s-1").await.unwrap();
        store.refresh(&backend).await.unwrap();

        let was_active = store.delete(&backend, "s-1").await.unwrap();
        assert!(was_active);
        assert!(store.active_id().is_none());
        assert!(store.summaries().is_empty());
    }

    #[tokio::test]
    async fn adopt_refreshes_exactly_once() {
        let backend = StubBackend::with_sessions(vec![summary("s-9", "New conversation")]);
        let mut store = SessionStore::new();

        let adopted = store.adopt(&backend, "s-9".to_string()).await.unwrap();
        assert!(adopted);
        assert_eq!(store.active_id(), Some("s-9"));
        assert_eq!(backend.list_calls(), 1);

        // The same id again is already known: no adoption, no refresh.
        let adopted = store.adopt(&backend, "s-9".to_string()).await.unwrap();
        assert!(!adopted);
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn reset_forgets_the_active_session() {
        let backend = StubBackend::with_sessions(vec![summary("s-1", "First visit")]);
        let mut store = SessionStore::new();

        store.load(&backend, "s-1").await.unwrap();
        store.reset();
        assert!(store.active_id().is_none());
    }
}

//! Logging trait for chat client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture all traffic passing through the [`Galen`](crate::Galen) client.

use crate::types::{ChatReply, SessionSummary};

/// A trait for logging chat client operations.
///
/// Implement this trait to capture and record decoded replies and session
/// listings, then install it with
/// [`Galen::with_logger`](crate::Galen::with_logger).
///
/// # Example
///
/// ```rust,ignore
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// use galen::{ChatReply, ClientLogger, SessionSummary};
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_reply(&self, reply: &ChatReply) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "reply: {}", reply.text).unwrap();
///     }
///
///     fn log_sessions(&self, sessions: &[SessionSummary]) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{} sessions listed", sessions.len()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a decoded reply from a successful `send_chat` call.
    ///
    /// Called once per successful send, after retries and response decoding,
    /// with the reply exactly as the chat controller will see it.
    fn log_reply(&self, reply: &ChatReply);

    /// Log a session listing from a successful `list_sessions` call.
    fn log_sessions(&self, sessions: &[SessionSummary]);
}

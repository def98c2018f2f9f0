//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

/// Default backend endpoint (the development proxy's address).
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the galen-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(
        optional,
        "Chat backend base URL (default: http://127.0.0.1:5000/)",
        "URL"
    )]
    pub backend_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Skip the startup disclaimer.
    #[arrrg(flag, "Skip the startup disclaimer message")]
    pub no_disclaimer: bool,
}

/// Resolved configuration for the chat application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL.
    pub backend_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to print the medical disclaimer when a conversation starts.
    pub show_disclaimer: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Backend: http://127.0.0.1:5000/
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - Disclaimer: shown
    pub fn new() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
            show_disclaimer: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Suppresses the startup disclaimer.
    pub fn without_disclaimer(mut self) -> Self {
        self.show_disclaimer = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            backend_url: args
                .backend_url
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            timeout: Duration::from_secs(args.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            use_color: !args.no_color,
            show_disclaimer: !args.no_disclaimer,
        }
    }
}

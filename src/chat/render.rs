//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows for
//! different output styles. The default implementation translates the
//! formatter's markup into ANSI-styled terminal text and draws the loading
//! placeholder that stands in for an in-flight request.

use std::io::{self, Stdout, Write};

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for italic text.
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code for dim text (used for the loading placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Erases the current line and returns the cursor to column one.
const ANSI_ERASE_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
///
/// The chat session drives this trait; implementations decide presentation.
/// `end_loading` is called on every outcome of a send, so implementations
/// can rely on the placeholder never outliving the request.
pub trait Renderer: Send {
    /// Print a formatted assistant reply.
    ///
    /// The argument is markup produced by [`crate::markup::format`].
    fn print_reply(&mut self, markup: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Show the loading placeholder for an in-flight request.
    fn begin_loading(&mut self);

    /// Remove the loading placeholder.
    fn end_loading(&mut self);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    loading: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI styling enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            loading: false,
        }
    }

    /// Flushes stdout so placeholder updates appear immediately.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, markup: &str) {
        println!("{}", markup_to_text(markup, self.use_color));
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("\nError: {error}");
    }

    fn begin_loading(&mut self) {
        self.loading = true;
        if self.use_color {
            print!("{ANSI_DIM}thinking…{ANSI_RESET}");
        } else {
            print!("[thinking]");
        }
        self.flush();
    }

    fn end_loading(&mut self) {
        if !self.loading {
            return;
        }
        self.loading = false;
        if self.use_color {
            print!("{ANSI_ERASE_LINE}");
        } else {
            println!();
        }
        self.flush();
    }
}

/// Translates formatter markup into terminal text.
///
/// Tags become ANSI styles (or vanish when color is off), `<br>` becomes a
/// newline, and entities unescape. Tags are translated before entities so
/// that escaped markup in the reply stays literal text.
pub fn markup_to_text(markup: &str, use_color: bool) -> String {
    let (bold, bold_end, italic, italic_end) = if use_color {
        (ANSI_BOLD, ANSI_RESET, ANSI_ITALIC, ANSI_RESET)
    } else {
        ("", "", "", "")
    };
    markup
        .replace("<br>", "\n")
        .replace("<strong>", bold)
        .replace("</strong>", bold_end)
        .replace("<em>", italic)
        .replace("</em>", italic_end)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn markup_translates_to_ansi() {
        let text = markup_to_text("<strong>hi</strong> and <em>there</em>", true);
        assert_eq!(
            text,
            format!("{ANSI_BOLD}hi{ANSI_RESET} and {ANSI_ITALIC}there{ANSI_RESET}")
        );
    }

    #[test]
    fn markup_strips_to_plain_text() {
        assert_eq!(
            markup_to_text("<br><strong><em>urgent</em></strong><br>", false),
            "\nurgent\n"
        );
    }

    #[test]
    fn entities_unescape_after_tags() {
        // Escaped markup in the reply must stay literal text.
        assert_eq!(
            markup_to_text("&lt;strong&gt; is a tag &amp; so is &lt;em&gt;", false),
            "<strong> is a tag & so is <em>"
        );
    }

    #[test]
    fn breaks_become_newlines() {
        assert_eq!(markup_to_text("a<br>b", false), "a\nb");
    }
}

//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages to
//! the backend.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a fresh, empty session.
    New,

    /// List saved sessions from the backend.
    Sessions,

    /// Load a session's history by id.
    Load(String),

    /// Delete a session by id.
    Delete(String),

    /// Stage an image attachment for the next message.
    Attach(String),

    /// Drop the staged attachment.
    Detach,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent to the assistant as a regular message.
///
/// # Examples
///
/// ```
/// # use galen::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/load s-42").is_some());
/// assert!(parse_command("I have a headache.").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" => ChatCommand::New,
        "sessions" | "history" => ChatCommand::Sessions,
        "load" => match argument {
            Some(id) => ChatCommand::Load(id.to_string()),
            None => ChatCommand::Invalid("/load requires a session id".to_string()),
        },
        "delete" => match argument {
            Some(id) => ChatCommand::Delete(id.to_string()),
            None => ChatCommand::Invalid("/delete requires a session id".to_string()),
        },
        "attach" => match argument {
            Some(path) => ChatCommand::Attach(path.to_string()),
            None => ChatCommand::Invalid("/attach requires a file path".to_string()),
        },
        "detach" => ChatCommand::Detach,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a fresh session (clears the transcript)
  /sessions              List saved sessions
  /load <id>             Load a session's history
  /delete <id>           Delete a session
  /attach <file>         Attach an image to the next message
  /detach                Drop the staged attachment
  /help                  Show this help message
  /quit                  Exit the chat"#
}

//! Interactive terminal chat with the medical assistant backend.
//!
//! This binary provides a REPL interface for conversing with the assistant
//! through a chat backend.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage against the local development backend
//! galen-chat
//!
//! # Point at a deployed backend
//! galen-chat --backend-url https://assistant.example.com/
//!
//! # Disable colors (useful for piping output)
//! galen-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a fresh session
//! - `/sessions` - List saved sessions
//! - `/load <id>` - Load a session's history
//! - `/delete <id>` - Delete a session
//! - `/attach <file>` - Attach an image to the next message
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use galen::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use galen::types::{ImageAttachment, SessionSummary};
use galen::{Galen, markup};

/// Disclaimer shown when a conversation starts, mirroring the one the
/// backend prepends to its answers.
const DISCLAIMER: &str = "***Disclaimer: I am an AI assistant and not a medical professional. \
The information I provide is for informational purposes only and not a substitute for \
professional medical advice, diagnosis, or treatment. Always consult with a qualified \
healthcare provider for any medical concerns.***";

/// Main entry point for the galen-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("galen-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = Galen::with_options(Some(config.backend_url.clone()), Some(config.timeout))?;
    let mut session = ChatSession::new(client);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Medical assistant chat ({})", config.backend_url);
    println!("Type /help for commands, /quit to exit\n");
    if config.show_disclaimer {
        renderer.print_reply(&markup::format(DISCLAIMER));
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            session.new_session();
                            renderer.print_info("Started a fresh session.");
                            if config.show_disclaimer {
                                renderer.print_reply(&markup::format(DISCLAIMER));
                            }
                        }
                        ChatCommand::Sessions => match session.refresh_sessions().await {
                            Ok(sessions) => print_sessions(&sessions),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Load(id) => match session.load_session(&id).await {
                            Ok(count) => renderer
                                .print_info(&format!("Loaded session {id} ({count} messages).")),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Delete(id) => match session.delete_session(&id).await {
                            Ok(true) => renderer.print_info(&format!(
                                "Deleted session {id}; started a fresh one."
                            )),
                            Ok(false) => renderer.print_info(&format!("Deleted session {id}.")),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Attach(path) => match ImageAttachment::from_path(&path) {
                            Ok(attachment) => {
                                renderer.print_info(&format!(
                                    "Attached {} ({}).",
                                    attachment.file_name, attachment.mime_type
                                ));
                                session.attach(attachment);
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Detach => {
                            if session.clear_attachment() {
                                renderer.print_info("Attachment dropped.");
                            } else {
                                renderer.print_info("No attachment staged.");
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                println!("Assistant:");
                if let Err(e) = session.send(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - clear the line and continue
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_sessions(sessions: &[SessionSummary]) {
    if sessions.is_empty() {
        println!("    No saved sessions.");
        return;
    }
    println!("    Sessions (most recent first):");
    for summary in sessions {
        println!("      {}  {}", summary.id, summary.title);
    }
}

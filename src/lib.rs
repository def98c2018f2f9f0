// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod history;
pub mod markup;
pub mod observability;
pub mod types;

// Re-exports
pub use client::{Backend, Galen};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use history::SessionStore;
pub use types::*;

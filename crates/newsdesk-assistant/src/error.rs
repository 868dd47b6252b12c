//! Error types for the assistant engine.
//!
//! Source failures never surface here: they are turned into assistant
//! messages. These errors cover input rejected before a round trip starts.

/// Errors from the assistant engine.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),
}

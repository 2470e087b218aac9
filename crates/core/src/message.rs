//! Chat message

use serde::{Deserialize, Serialize};

/// A single turn of a conversation.
///
/// Roles are free-form strings so that arbitrary client roles survive the
/// trip into the prompt framing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    /// The role of the message (`system`, `user`, `assistant`, ...)
    pub role: String,

    /// The content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an arbitrary role
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

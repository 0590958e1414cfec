//! Message and message-log domain types.
//!
//! A [`MessageLog`] is the append-only chat transcript of one session.
//! Only user and assistant turns are ever stored in it; system context is
//! synthesized per call and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The language model
    Assistant,
    /// Injected context (never stored in a log)
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the session log, assigned at append time
    pub seq: u64,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message outside of any log (e.g. a one-shot prompt).
    pub fn new(seq: u64, role: Role, content: impl Into<String>) -> Self {
        Self {
            seq,
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(seq: u64, content: impl Into<String>) -> Self {
        Self::new(seq, Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(seq: u64, content: impl Into<String>) -> Self {
        Self::new(seq, Role::Assistant, content)
    }
}

/// Append-only, gapless sequence of user and assistant messages.
///
/// Sequence numbers start at 0 and are assigned by the log itself, so they
/// are strictly increasing with no gaps regardless of how callers interleave
/// appends. A `System` message can never be appended and nothing is ever
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message and return it.
    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Role::User, content.into())
    }

    /// Append an assistant message and return it.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Role::Assistant, content.into())
    }

    fn push(&mut self, role: Role, content: String) -> &Message {
        let seq = self.next_seq();
        self.messages.push(Message::new(seq, role, content));
        &self.messages[self.messages.len() - 1]
    }

    /// The sequence number the next appended message will receive.
    pub fn next_seq(&self) -> u64 {
        self.messages.len() as u64
    }

    /// All messages in sequence order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get the total token count estimate (rough: 4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user(3, "Hello, pump expert!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.seq, 3);
        assert_eq!(msg.content, "Hello, pump expert!");
    }

    #[test]
    fn log_assigns_gapless_sequence() {
        let mut log = MessageLog::new();
        log.push_user("first");
        log.push_assistant("second");
        log.push_user("third");
        log.push_user("fourth");

        let seqs: Vec<u64> = log.messages().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        assert_eq!(log.next_seq(), 4);
    }

    #[test]
    fn log_never_holds_system_messages() {
        let mut log = MessageLog::new();
        log.push_user("q");
        log.push_assistant("a");
        assert!(log.messages().iter().all(|m| m.role != Role::System));
    }

    #[test]
    fn push_returns_appended_message() {
        let mut log = MessageLog::new();
        let appended = log.push_assistant("Consider stainless steel.").clone();
        assert_eq!(appended.seq, 0);
        assert_eq!(log.last(), Some(&appended));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user(0, "Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
        assert_eq!(deserialized.seq, 0);
    }

    #[test]
    fn token_estimate() {
        let mut log = MessageLog::new();
        // 20 chars ≈ 5 tokens
        log.push_user("12345678901234567890");
        assert_eq!(log.estimated_tokens(), 5);
    }
}

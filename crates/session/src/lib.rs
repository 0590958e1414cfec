//! # Pumpwise Session
//!
//! Conversation state for the pump selection advisor: the current
//! specification record, the chat log, and the context derived from the
//! record on every provider call.

pub mod context;
pub mod prompt;
pub mod session;
pub mod shared;

#[cfg(test)]
mod test_helpers;

pub use context::ContextBuilder;
pub use prompt::{RECOMMENDATION_INSTRUCTION, RECOMMENDATION_SYSTEM_ROLE, recommendation_prompt};
pub use session::{ConversationSession, SessionId, SessionState};
pub use shared::SharedSession;

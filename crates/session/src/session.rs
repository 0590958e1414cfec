//! The conversation session: one specification record, one chat log.
//!
//! A session has two independent views over the same record:
//!
//! - [`ConversationSession::start_generation`] produces the one-shot
//!   "suggested solution". It never touches the chat log.
//! - [`ConversationSession::post_user_message`] runs one chat turn, with the
//!   context rebuilt from the *current* record on every call.
//!
//! Each operation calls the provider at most once. A failed call leaves the
//! session in a well-defined, continuable state: the record is unchanged and
//! the log holds exactly what the user sent.

use crate::context::ContextBuilder;
use crate::prompt::{RECOMMENDATION_SYSTEM_ROLE, recommendation_prompt};
use pumpwise_core::error::{ProviderError, SessionError};
use pumpwise_core::message::{Message, MessageLog};
use pumpwise_core::provider::{Completion, CompletionProvider};
use pumpwise_core::spec::SpecificationRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique identifier for a session, used to correlate log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No record has been generated for yet
    Empty,
    /// A generation succeeded; chat turns use its record as context
    Specified,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Empty => f.write_str("empty"),
            SessionState::Specified => f.write_str("specified"),
        }
    }
}

/// Owns the current specification record and the chat log of one user.
pub struct ConversationSession {
    id: SessionId,
    provider: Arc<dyn CompletionProvider>,
    record: Option<SpecificationRecord>,
    log: MessageLog,
    call_timeout: Option<Duration>,
}

impl ConversationSession {
    /// Create an empty session backed by `provider`.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            id: SessionId::new(),
            provider,
            record: None,
            log: MessageLog::new(),
            call_timeout: None,
        }
    }

    /// Bound every provider call; an elapsed timeout is reported as
    /// [`ProviderError::Timeout`] like any other provider failure.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn state(&self) -> SessionState {
        if self.is_specified() {
            SessionState::Specified
        } else {
            SessionState::Empty
        }
    }

    pub fn is_specified(&self) -> bool {
        self.record.is_some()
    }

    /// The record of the last successful generation.
    pub fn current_record(&self) -> Option<&SpecificationRecord> {
        self.record.as_ref()
    }

    /// The context the next chat turn will send.
    pub fn context(&self) -> String {
        ContextBuilder::for_record(self.record.as_ref())
    }

    /// Owned snapshot of the chat log in sequence order.
    pub fn history(&self) -> Vec<Message> {
        self.log.messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Ask for a recommended solution for `record`.
    ///
    /// On success `record` becomes the session's current record and the
    /// generated text is returned. The chat log is never modified; on
    /// failure nothing is.
    pub async fn start_generation(
        &mut self,
        record: SpecificationRecord,
    ) -> Result<String, SessionError> {
        let prompt = [Message::user(0, recommendation_prompt(&record))];

        debug!(session = %self.id, provider = %self.provider.name(), "Requesting recommendation");

        match self.call(RECOMMENDATION_SYSTEM_ROLE, &prompt).await {
            Ok(completion) => {
                info!(
                    session = %self.id,
                    model = completion.model.as_deref().unwrap_or("unknown"),
                    chars = completion.text.len(),
                    "Recommendation generated"
                );
                self.record = Some(record);
                Ok(completion.text)
            }
            Err(e) => {
                warn!(session = %self.id, kind = %e.kind(), error = %e, "Recommendation failed");
                Err(e.into())
            }
        }
    }

    /// Run one chat turn.
    ///
    /// Blank input fails with [`SessionError::EmptyInput`] and changes
    /// nothing. Otherwise the user message is appended first; the provider
    /// then sees the current context followed by the whole log. On success
    /// the assistant reply is appended and returned. On failure the user
    /// message stays in the log and no reply is added, so calling again
    /// resends the same, grown log.
    pub async fn post_user_message(&mut self, text: &str) -> Result<Message, SessionError> {
        if text.trim().is_empty() {
            debug!(session = %self.id, "Rejected empty chat message");
            return Err(SessionError::EmptyInput);
        }

        let seq = self.log.push_user(text).seq;
        let context = self.context();

        debug!(
            session = %self.id,
            seq,
            state = %self.state(),
            messages = self.log.len(),
            est_tokens = self.log.estimated_tokens(),
            "Sending chat turn"
        );

        match self.call(&context, self.log.messages()).await {
            Ok(completion) => {
                let reply = self.log.push_assistant(completion.text).clone();
                info!(session = %self.id, seq = reply.seq, "Chat turn completed");
                Ok(reply)
            }
            Err(e) => {
                warn!(session = %self.id, seq, kind = %e.kind(), error = %e, "Chat turn failed");
                Err(e.into())
            }
        }
    }

    async fn call(
        &self,
        context: &str,
        messages: &[Message],
    ) -> Result<Completion, ProviderError> {
        let request = self.provider.complete(context, messages);
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.unwrap_or_else(|_| {
                Err(ProviderError::Timeout(format!(
                    "Provider '{}' did not answer within {}ms",
                    self.provider.name(),
                    limit.as_millis()
                )))
            }),
            None => request.await,
        }
    }
}

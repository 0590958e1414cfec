//! Shareable handle to one session.
//!
//! Operations on the same session are serialized: while a chat turn awaits
//! the provider, a concurrent turn or generation waits for the lock rather
//! than interleaving its appends. Distinct sessions never contend.

use crate::session::{ConversationSession, SessionId, SessionState};
use pumpwise_core::error::SessionError;
use pumpwise_core::message::Message;
use pumpwise_core::spec::SpecificationRecord;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct SharedSession {
    id: SessionId,
    inner: Arc<Mutex<ConversationSession>>,
}

impl SharedSession {
    pub fn new(session: ConversationSession) -> Self {
        Self {
            id: session.id().clone(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub async fn start_generation(
        &self,
        record: SpecificationRecord,
    ) -> Result<String, SessionError> {
        self.inner.lock().await.start_generation(record).await
    }

    pub async fn post_user_message(&self, text: &str) -> Result<Message, SessionError> {
        self.inner.lock().await.post_user_message(text).await
    }

    pub async fn history(&self) -> Vec<Message> {
        self.inner.lock().await.history()
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state()
    }

    pub async fn current_record(&self) -> Option<SpecificationRecord> {
        self.inner.lock().await.current_record().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, sample_record};
    use pumpwise_core::message::Role;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn concurrent_turns_do_not_interleave() {
        let provider = Arc::new(
            ScriptedProvider::texts(&["a1", "a2", "a3", "a4"]).with_delay(Duration::from_millis(50)),
        );
        let shared = SharedSession::new(ConversationSession::new(provider.clone()));

        let handles: Vec<_> = ["q1", "q2", "q3", "q4"]
            .into_iter()
            .map(|q| {
                let s = shared.clone();
                tokio::spawn(async move { s.post_user_message(q).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let history = shared.history().await;
        assert_eq!(history.len(), 8);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[1].seq, pair[0].seq + 1);
        }
        // Each call saw a log ending in its own, unanswered user message.
        for call in provider.calls() {
            assert_eq!(call.messages.last().unwrap().role, Role::User);
            assert_eq!(call.messages.len() % 2, 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn generation_waits_for_inflight_turn() {
        let provider = Arc::new(
            ScriptedProvider::texts(&["reply", "solution"]).with_delay(Duration::from_millis(50)),
        );
        let shared = SharedSession::new(ConversationSession::new(provider.clone()));

        let chat = {
            let s = shared.clone();
            tokio::spawn(async move { s.post_user_message("Hi").await })
        };
        tokio::task::yield_now().await;
        let generated = shared.start_generation(sample_record()).await.unwrap();
        chat.await.unwrap().unwrap();

        assert_eq!(generated, "solution");
        assert_eq!(shared.state().await, SessionState::Specified);
        assert_eq!(shared.current_record().await, Some(sample_record()));
        // The chat turn ran against the placeholder since it started first.
        assert!(provider.calls()[0].context.starts_with("Pump Data: not provided yet"));
    }

    #[tokio::test]
    async fn clones_share_one_session() {
        let provider = Arc::new(ScriptedProvider::texts(&["a"]));
        let shared = SharedSession::new(ConversationSession::new(provider));
        let other = shared.clone();

        shared.post_user_message("q").await.unwrap();

        assert_eq!(other.id(), shared.id());
        assert_eq!(other.history().await.len(), 2);
    }
}

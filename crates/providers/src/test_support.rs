//! Stub providers shared by the decorator tests.

use async_trait::async_trait;
use pumpwise_core::error::ProviderError;
use pumpwise_core::message::Message;
use pumpwise_core::provider::{Completion, CompletionProvider};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Returns scripted outcomes in order, then repeats the last one.
pub struct StubProvider {
    name: String,
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    last: Mutex<Option<Result<String, ProviderError>>>,
    contexts: Mutex<Vec<String>>,
    healthy: bool,
}

impl StubProvider {
    pub fn scripted(name: &str, outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            name: name.into(),
            outcomes: Mutex::new(outcomes.into()),
            last: Mutex::new(None),
            contexts: Mutex::new(Vec::new()),
            healthy: true,
        }
    }

    pub fn always_ok(name: &str, text: &str) -> Self {
        Self::scripted(name, vec![Ok(text.into())])
    }

    pub fn always_err(name: &str, error: ProviderError) -> Self {
        Self::scripted(name, vec![Err(error)])
    }

    pub fn unhealthy(name: &str) -> Self {
        Self {
            healthy: false,
            ..Self::always_err(name, ProviderError::Unknown("down".into()))
        }
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    pub fn last_context(&self) -> Option<String> {
        self.contexts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        context: &str,
        _messages: &[Message],
    ) -> Result<Completion, ProviderError> {
        self.contexts.lock().unwrap().push(context.to_string());

        let next = self.outcomes.lock().unwrap().pop_front();
        let outcome = match next {
            Some(outcome) => {
                *self.last.lock().unwrap() = Some(outcome.clone());
                outcome
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(ProviderError::Unknown("no outcomes scripted".into()))),
        };
        outcome.map(Completion::text)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        if self.healthy {
            Ok(true)
        } else {
            Err(ProviderError::Unknown("down".into()))
        }
    }
}

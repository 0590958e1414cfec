//! Shared test helpers for session tests.

use pumpwise_core::error::ProviderError;
use pumpwise_core::message::Message;
use pumpwise_core::provider::{Completion, CompletionProvider};
use pumpwise_core::spec::{FluidType, Material, PumpType, SealingSystem, SpecificationRecord};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One provider call as the provider saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub context: String,
    pub messages: Vec<Message>,
}

/// A mock provider that returns a sequence of scripted outcomes.
///
/// Each call to `complete` pops the next outcome and records the context
/// and messages it was given. Panics if more calls are made than outcomes
/// provided.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a provider that answers every scripted call with text.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Sleep before answering (to exercise timeouts and interleaving).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("provider was never called")
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(
        &self,
        context: &str,
        messages: &[Message],
    ) -> Result<Completion, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            context: context.to_string(),
            messages: messages.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider: no more outcomes");
        outcome.map(Completion::text)
    }
}

/// A valid record used across tests.
pub fn sample_record() -> SpecificationRecord {
    SpecificationRecord {
        head: 10.0,
        flow: 5.0,
        material: Material::Steel,
        fluid_type: FluidType::Water,
        pumping_temperature: 20.0,
        pump_type: PumpType::Centrifugal,
        sealing_system: SealingSystem::MechanicalSeal,
        installation_area: "Basement plant room".into(),
        ambient_temperature: 25.0,
        description: "Cooling water loop".into(),
    }
}

//! CompletionProvider trait: the abstraction over language-model backends.
//!
//! A provider takes a context string (sent as the system message) plus an
//! ordered message list and returns generated text or a typed failure.
//!
//! Implementations: OpenAI-compatible HTTP endpoints, plus the retry and
//! fallback decorators in `pumpwise-providers`.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub text: String,

    /// Which model actually responded, if the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Completion {
    /// A completion carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            usage: None,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core provider trait.
///
/// The session calls `complete()` at most once per operation and never
/// retries on its own; retry and fallback policies are layered on top as
/// decorators that implement this same trait.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "retry(openai)").
    fn name(&self) -> &str;

    /// Send `context` followed by `messages` and get the generated reply.
    async fn complete(
        &self,
        context: &str,
        messages: &[Message],
    ) -> std::result::Result<Completion, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            context: &str,
            messages: &[Message],
        ) -> std::result::Result<Completion, ProviderError> {
            Ok(Completion::text(format!("{context}|{}", messages.len())))
        }
    }

    #[tokio::test]
    async fn trait_object_dispatch() {
        let provider: std::sync::Arc<dyn CompletionProvider> = std::sync::Arc::new(EchoProvider);
        let messages = vec![Message::user(0, "hi")];
        let completion = provider.complete("ctx", &messages).await.unwrap();
        assert_eq!(completion.text, "ctx|1");
        assert!(provider.health_check().await.unwrap());
    }

    #[test]
    fn completion_skips_empty_metadata() {
        let json = serde_json::to_string(&Completion::text("ok")).unwrap();
        assert_eq!(json, r#"{"text":"ok"}"#);
    }
}

//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI and any
//! endpoint exposing `/v1/chat/completions`.
//!
//! The session's context string is sent as the single system message,
//! followed by the log in order. HTTP and payload failures are classified
//! into the four [`ProviderError`] kinds:
//!
//! | Failure                                   | Kind              |
//! |-------------------------------------------|-------------------|
//! | client timeout, HTTP 408 / 504            | `Timeout`         |
//! | HTTP 429                                  | `RateLimited`     |
//! | unparseable body, no choices, empty text  | `InvalidResponse` |
//! | anything else (network, auth, 5xx)        | `Unknown`         |

use async_trait::async_trait;
use pumpwise_core::error::ProviderError;
use pumpwise_core::message::{Message, Role};
use pumpwise_core::provider::{Completion, CompletionProvider, Usage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// An OpenAI-compatible chat completion provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    request_timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: "gpt-3.5-turbo".into(),
            temperature: 0.7,
            max_tokens: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client,
        })
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Result<Self, ProviderError> {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Per-request HTTP timeout; elapsed requests surface as `Timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Context first as the system message, then the log in order.
    fn to_api_messages(context: &str, messages: &[Message]) -> Vec<ApiMessage> {
        std::iter::once(ApiMessage {
            role: Role::System.as_str().into(),
            content: Some(context.to_string()),
        })
        .chain(messages.iter().map(|m| ApiMessage {
            role: m.role.as_str().into(),
            content: Some(m.content.clone()),
        }))
        .collect()
    }

    fn build_body(&self, context: &str, messages: &[Message]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(context, messages),
            "temperature": self.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(format!(
                "{} did not answer within {}s",
                self.name,
                self.request_timeout.as_secs()
            ))
        } else {
            ProviderError::Unknown(format!("Network error: {e}"))
        }
    }
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn classify_status(status: u16, retry_after_secs: Option<u64>, body: &str) -> ProviderError {
    let detail = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };

    match status {
        429 => ProviderError::RateLimited {
            retry_after_secs,
            detail,
        },
        408 | 504 => ProviderError::Timeout(detail),
        401 | 403 => ProviderError::Unknown(format!(
            "Invalid API key or insufficient permissions ({detail})"
        )),
        _ => ProviderError::Unknown(detail),
    }
}

/// Parse a `Retry-After` header given in whole seconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Decode a successful chat completion body.
pub(crate) fn parse_response(body: &str) -> Result<Completion, ProviderError> {
    let api_response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

    let text = choice.message.content.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ProviderError::InvalidResponse(
            "Response contained no text".into(),
        ));
    }

    let usage = api_response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(Completion {
        text,
        model: api_response.model,
        usage,
    })
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        context: &str,
        messages: &[Message],
    ) -> std::result::Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(context, messages);

        debug!(
            provider = %self.name,
            model = %self.model,
            messages = messages.len() + 1,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !(200..300).contains(&status) {
            warn!(provider = %self.name, status, body = %text, "Provider returned error");
            return Err(classify_status(status, retry_after, &text));
        }

        parse_response(&text)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Ok(response.status().is_success())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

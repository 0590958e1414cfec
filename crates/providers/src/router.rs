//! Provider router: builds the configured providers and the call chain.
//!
//! The chain handed to a session is
//! `retry(default)` or, with a fallback list,
//! `fallback(retry(default), retry(fallback_1), ...)`.

use crate::fallback::FallbackProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::retry::{RetryPolicy, RetryProvider};
use pumpwise_config::AppConfig;
use pumpwise_core::error::{Error, Result};
use pumpwise_core::provider::CompletionProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of named providers with a default.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn CompletionProvider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn CompletionProvider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn CompletionProvider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CompletionProvider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build one provider from configuration.
fn build_provider(config: &AppConfig, name: &str) -> Result<OpenAiCompatProvider> {
    let provider_config = config.providers.get(name);

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .or_else(|| default_base_url(name).map(String::from))
        .ok_or_else(|| Error::Config {
            message: format!(
                "Unknown provider '{name}': set providers.{name}.api_url in config.toml"
            ),
        })?;

    let provider = OpenAiCompatProvider::new(name, base_url, api_key)?
        .with_model(config.model_for(name))
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);

    debug!(provider = %name, model = %provider.model(), url = %provider.base_url(), "Built provider");
    Ok(provider)
}

/// Build every configured provider, plus the default and fallbacks.
pub fn build_from_config(config: &AppConfig) -> Result<ProviderRouter> {
    let mut router = ProviderRouter::new(&config.default_provider);

    let names = config
        .providers
        .keys()
        .chain(std::iter::once(&config.default_provider))
        .chain(config.fallback.iter());

    for name in names {
        if router.get(name).is_none() {
            router.register(name.clone(), Arc::new(build_provider(config, name)?));
        }
    }

    Ok(router)
}

/// Build the provider a session should call: retries around the default,
/// then the fallback list in order.
pub fn build_chain(config: &AppConfig) -> Result<Arc<dyn CompletionProvider>> {
    let router = build_from_config(config)?;
    let policy = RetryPolicy::from(&config.retry);

    let with_retry = |name: &str| -> Result<Arc<dyn CompletionProvider>> {
        let inner = router.get(name).ok_or_else(|| Error::Config {
            message: format!("Provider '{name}' is not configured"),
        })?;
        Ok(Arc::new(RetryProvider::new(inner, policy.clone())))
    };

    let primary = with_retry(&config.default_provider)?;
    if config.fallback.is_empty() {
        return Ok(primary);
    }

    let mut chain = FallbackProvider::for_policy(&policy).then(primary);
    for name in &config.fallback {
        chain = chain.then(with_retry(name)?);
    }
    Ok(Arc::new(chain))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "fireworks" => Some("https://api.fireworks.ai/inference/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        "llamacpp" | "llama.cpp" => Some("http://localhost:8080/v1"),
        _ => None,
    }
}

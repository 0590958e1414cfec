//! Provider fallback: hand the request to the next chain when one gives up.
//!
//! Entries are normally [`RetryProvider`](crate::retry::RetryProvider)s, so an
//! entry only counts as failed once its own retries are spent. Every entry
//! gets the same time budget, derived from the retry policy it runs under.
//! When the whole chain fails, the returned error keeps the kind of the last
//! failure and its detail names each entry with the kind it failed with.

use crate::retry::RetryPolicy;
use async_trait::async_trait;
use pumpwise_core::error::ProviderError;
use pumpwise_core::message::Message;
use pumpwise_core::provider::{Completion, CompletionProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Ordered list of provider chains sharing one per-entry budget.
pub struct FallbackProvider {
    name: String,
    entries: Vec<Arc<dyn CompletionProvider>>,
    entry_budget: Duration,
}

/// A chain entry that gave up, kept for the final report.
struct EntryFailure {
    provider: String,
    error: ProviderError,
}

impl FallbackProvider {
    pub fn new(entry_budget: Duration) -> Self {
        Self {
            name: "fallback()".into(),
            entries: Vec::new(),
            entry_budget,
        }
    }

    /// Budget each entry by the worst case of `policy`.
    pub fn for_policy(policy: &RetryPolicy) -> Self {
        Self::new(policy.worst_case_duration())
    }

    /// Append a provider tried after every entry already in the chain.
    pub fn then(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.entries.push(provider);
        let name = format!("fallback({})", self.provider_names().join(", "));
        self.name = name;
        self
    }

    pub fn entry_budget(&self) -> Duration {
        self.entry_budget
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name()).collect()
    }

    async fn run_entry(
        &self,
        provider: &dyn CompletionProvider,
        context: &str,
        messages: &[Message],
    ) -> Result<Completion, ProviderError> {
        tokio::time::timeout(self.entry_budget, provider.complete(context, messages))
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout(format!(
                    "exceeded its {}s fallback budget",
                    self.entry_budget.as_secs()
                )))
            })
    }
}

/// Summarize every failed entry under the kind of the last one.
fn exhausted(failures: Vec<EntryFailure>) -> ProviderError {
    let summary = failures
        .iter()
        .map(|f| format!("{} failed with {} ({})", f.provider, f.error.kind(), f.error.detail()))
        .collect::<Vec<_>>()
        .join("; ");
    let total = failures.len();

    match failures.into_iter().last() {
        Some(last) => with_detail(
            last.error,
            format!("all {total} fallback entries failed: {summary}"),
        ),
        None => ProviderError::Unknown("fallback chain has no providers".into()),
    }
}

fn with_detail(error: ProviderError, detail: String) -> ProviderError {
    match error {
        ProviderError::Timeout(_) => ProviderError::Timeout(detail),
        ProviderError::RateLimited {
            retry_after_secs, ..
        } => ProviderError::RateLimited {
            retry_after_secs,
            detail,
        },
        ProviderError::InvalidResponse(_) => ProviderError::InvalidResponse(detail),
        ProviderError::Unknown(_) => ProviderError::Unknown(detail),
    }
}

#[async_trait]
impl CompletionProvider for FallbackProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        context: &str,
        messages: &[Message],
    ) -> std::result::Result<Completion, ProviderError> {
        let mut failures = Vec::new();

        for (index, provider) in self.entries.iter().enumerate() {
            debug!(provider = %provider.name(), entry = index + 1, total = self.entries.len(), "Fallback entry dispatched");

            match self.run_entry(provider.as_ref(), context, messages).await {
                Ok(completion) => {
                    if index > 0 {
                        info!(provider = %provider.name(), entry = index + 1, "Fallback entry answered");
                    }
                    return Ok(completion);
                }
                Err(error) => {
                    warn!(
                        provider = %provider.name(),
                        entry = index + 1,
                        kind = %error.kind(),
                        error = %error,
                        "Fallback entry gave up"
                    );
                    failures.push(EntryFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        Err(exhausted(failures))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        for provider in &self.entries {
            if let Ok(true) = provider.health_check().await {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

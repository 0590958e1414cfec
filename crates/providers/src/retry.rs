//! Retry decorator with exponential backoff.
//!
//! Wraps any provider and re-issues the same request on retryable failures.
//! The caller still makes exactly one `complete()` call and sees either the
//! first success or the final error.

use async_trait::async_trait;
use pumpwise_config::RetryConfig;
use pumpwise_core::error::ProviderError;
use pumpwise_core::message::Message;
use pumpwise_core::provider::{Completion, CompletionProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// When and how long to wait between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Bound on a single attempt; `None` leaves it to the inner provider
    pub attempt_timeout: Option<Duration>,
    /// Whether `Unknown` failures (network, 5xx) are retried
    pub retry_unknown: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            attempt_timeout: (config.attempt_timeout_secs > 0)
                .then(|| Duration::from_secs(config.attempt_timeout_secs)),
            retry_unknown: config.retry_unknown,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Malformed responses are never retried; the same request would get
    /// the same answer.
    pub fn should_retry(&self, error: &ProviderError) -> bool {
        match error {
            ProviderError::Timeout(_) | ProviderError::RateLimited { .. } => true,
            ProviderError::Unknown(_) => self.retry_unknown,
            ProviderError::InvalidResponse(_) => false,
        }
    }

    /// Longest a caller can wait on one retried request: every attempt
    /// running to its timeout plus every backoff at the cap. Attempts
    /// without a timeout are counted at two minutes.
    pub fn worst_case_duration(&self) -> Duration {
        let per_attempt = self.attempt_timeout.unwrap_or(Duration::from_secs(120));
        per_attempt
            .saturating_mul(self.max_attempts)
            .saturating_add(self.max_backoff.saturating_mul(self.max_attempts.saturating_sub(1)))
    }

    /// Wait before retry number `retry` (1-based), doubling each time and
    /// capped at `max_backoff`. A server-suggested wait wins when it is
    /// longer, still within the cap.
    pub fn backoff_for(&self, retry: u32, error: &ProviderError) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let computed = self
            .initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff);

        match error {
            ProviderError::RateLimited {
                retry_after_secs: Some(secs),
                ..
            } => computed.max(Duration::from_secs(*secs)).min(self.max_backoff),
            _ => computed,
        }
    }
}

/// A provider that retries its inner provider according to a [`RetryPolicy`].
pub struct RetryProvider {
    name: String,
    inner: Arc<dyn CompletionProvider>,
    policy: RetryPolicy,
}

impl RetryProvider {
    pub fn new(inner: Arc<dyn CompletionProvider>, policy: RetryPolicy) -> Self {
        Self {
            name: format!("retry({})", inner.name()),
            inner,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn attempt(
        &self,
        context: &str,
        messages: &[Message],
    ) -> Result<Completion, ProviderError> {
        let request = self.inner.complete(context, messages);
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.unwrap_or_else(|_| {
                Err(ProviderError::Timeout(format!(
                    "Provider '{}' timed out after {}s",
                    self.inner.name(),
                    limit.as_secs()
                )))
            }),
            None => request.await,
        }
    }
}

#[async_trait]
impl CompletionProvider for RetryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        context: &str,
        messages: &[Message],
    ) -> std::result::Result<Completion, ProviderError> {
        let mut attempt = 1;
        loop {
            match self.attempt(context, messages).await {
                Ok(completion) => {
                    if attempt > 1 {
                        debug!(provider = %self.inner.name(), attempt, "Retry succeeded");
                    }
                    return Ok(completion);
                }
                Err(e) if attempt < self.policy.max_attempts && self.policy.should_retry(&e) => {
                    let backoff = self.policy.backoff_for(attempt, &e);
                    warn!(
                        provider = %self.inner.name(),
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        kind = %e.kind(),
                        error = %e,
                        "Retrying after transient error"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubProvider;
    use pumpwise_core::error::ErrorKind;
    use tokio::time::Instant;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            attempt_timeout: None,
            retry_unknown: true,
        }
    }

    fn timeout() -> ProviderError {
        ProviderError::Timeout("slow".into())
    }

    #[test]
    fn policy_from_config() {
        let p = RetryPolicy::from(&RetryConfig::default());
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.initial_backoff, Duration::from_millis(500));
        assert_eq!(p.max_backoff, Duration::from_secs(8));
        assert_eq!(p.attempt_timeout, Some(Duration::from_secs(60)));
        assert!(p.retry_unknown);
    }

    #[test]
    fn zero_attempt_timeout_disables_bound() {
        let config = RetryConfig {
            attempt_timeout_secs: 0,
            max_attempts: 0,
            ..RetryConfig::default()
        };
        let p = RetryPolicy::from(&config);
        assert_eq!(p.attempt_timeout, None);
        assert_eq!(p.max_attempts, 1);
    }

    #[test]
    fn worst_case_covers_attempts_and_backoff() {
        // 3 x 60s + 2 x 8s
        assert_eq!(
            RetryPolicy::default().worst_case_duration(),
            Duration::from_secs(196)
        );
        let untimed = RetryPolicy {
            attempt_timeout: None,
            ..RetryPolicy::none()
        };
        assert_eq!(untimed.worst_case_duration(), Duration::from_secs(120));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let p = policy(10);
        let e = timeout();
        assert_eq!(p.backoff_for(1, &e), Duration::from_millis(500));
        assert_eq!(p.backoff_for(2, &e), Duration::from_millis(1000));
        assert_eq!(p.backoff_for(3, &e), Duration::from_millis(2000));
        assert_eq!(p.backoff_for(5, &e), Duration::from_secs(8));
        assert_eq!(p.backoff_for(40, &e), Duration::from_secs(8));
    }

    #[test]
    fn retry_after_extends_backoff_within_cap() {
        let p = policy(3);
        let short = ProviderError::RateLimited {
            retry_after_secs: Some(3),
            detail: String::new(),
        };
        let long = ProviderError::RateLimited {
            retry_after_secs: Some(120),
            detail: String::new(),
        };
        assert_eq!(p.backoff_for(1, &short), Duration::from_secs(3));
        assert_eq!(p.backoff_for(1, &long), Duration::from_secs(8));
    }

    #[test]
    fn retry_classification() {
        let mut p = policy(3);
        assert!(p.should_retry(&timeout()));
        assert!(p.should_retry(&ProviderError::Unknown("502".into())));
        assert!(!p.should_retry(&ProviderError::InvalidResponse("x".into())));
        p.retry_unknown = false;
        assert!(!p.should_retry(&ProviderError::Unknown("502".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_then_succeeds() {
        let inner = Arc::new(StubProvider::scripted(
            "openai",
            vec![Err(timeout()), Err(timeout()), Ok("done".into())],
        ));
        let provider = RetryProvider::new(inner.clone(), policy(3));

        let start = Instant::now();
        let completion = provider.complete("ctx", &[]).await.unwrap();

        assert_eq!(completion.text, "done");
        assert_eq!(inner.calls(), 3);
        // 500ms + 1000ms of backoff on the paused clock.
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let inner = Arc::new(StubProvider::always_err("openai", timeout()));
        let provider = RetryProvider::new(inner.clone(), policy(3));

        let err = provider.complete("ctx", &[]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderTimeout);
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn invalid_response_is_not_retried() {
        let inner = Arc::new(StubProvider::always_err(
            "openai",
            ProviderError::InvalidResponse("no choices".into()),
        ));
        let provider = RetryProvider::new(inner.clone(), policy(5));

        let err = provider.complete("ctx", &[]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderInvalidResponse);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn single_attempt_policy_never_retries() {
        let inner = Arc::new(StubProvider::always_err("openai", timeout()));
        let provider = RetryProvider::new(inner.clone(), RetryPolicy::none());

        assert!(provider.complete("ctx", &[]).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_waits_for_retry_after() {
        let inner = Arc::new(StubProvider::scripted(
            "openai",
            vec![
                Err(ProviderError::RateLimited {
                    retry_after_secs: Some(4),
                    detail: "429".into(),
                }),
                Ok("ok".into()),
            ],
        ));
        let provider = RetryProvider::new(inner.clone(), policy(2));

        let start = Instant::now();
        provider.complete("ctx", &[]).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_timeout_is_retried() {
        struct SlowThenFast {
            calls: std::sync::atomic::AtomicU32,
        }

        #[async_trait]
        impl CompletionProvider for SlowThenFast {
            fn name(&self) -> &str {
                "slow"
            }

            async fn complete(
                &self,
                _context: &str,
                _messages: &[Message],
            ) -> Result<Completion, ProviderError> {
                let n = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                if n == 0 {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                }
                Ok(Completion::text("fast"))
            }
        }

        let mut p = policy(2);
        p.attempt_timeout = Some(Duration::from_secs(5));
        let provider = RetryProvider::new(
            Arc::new(SlowThenFast {
                calls: std::sync::atomic::AtomicU32::new(0),
            }),
            p,
        );

        assert_eq!(provider.complete("ctx", &[]).await.unwrap().text, "fast");
    }

    #[test]
    fn name_wraps_inner() {
        let provider = RetryProvider::new(
            Arc::new(StubProvider::always_ok("openai", "x")),
            RetryPolicy::default(),
        );
        assert_eq!(provider.name(), "retry(openai)");
    }
}

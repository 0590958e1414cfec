//! LLM provider implementations for Pumpwise.
//!
//! All providers implement `pumpwise_core::CompletionProvider`. Retry and
//! fallback are decorators over the same trait; the router assembles them
//! from configuration.

pub mod fallback;
pub mod openai_compat;
pub mod retry;
pub mod router;

#[cfg(test)]
mod test_support;

pub use fallback::FallbackProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use retry::{RetryPolicy, RetryProvider};
pub use router::{ProviderRouter, build_chain, build_from_config, default_base_url};

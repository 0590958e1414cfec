//! Error types for the Pumpwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`ErrorKind`] is the flat,
//! copyable classification callers match on when rendering a failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The top-level error type for building and wiring Pumpwise components.
///
/// Session operations report [`SessionError`]; this type covers setup,
/// where a bad provider entry surfaces as a configuration problem.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Flat classification of every failure a session operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Local validation: the chat text was empty or whitespace only.
    EmptyInput,
    ProviderTimeout,
    ProviderRateLimited,
    ProviderInvalidResponse,
    ProviderUnknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::ProviderTimeout => "provider_timeout",
            ErrorKind::ProviderRateLimited => "provider_rate_limited",
            ErrorKind::ProviderInvalidResponse => "provider_invalid_response",
            ErrorKind::ProviderUnknown => "provider_unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Bounded context errors ---

/// A failed completion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited by provider: {detail}")]
    RateLimited {
        /// Server-suggested wait, when the provider sent one.
        retry_after_secs: Option<u64>,
        detail: String,
    },

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Provider request failed: {0}")]
    Unknown(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Timeout(_) => ErrorKind::ProviderTimeout,
            ProviderError::RateLimited { .. } => ErrorKind::ProviderRateLimited,
            ProviderError::InvalidResponse(_) => ErrorKind::ProviderInvalidResponse,
            ProviderError::Unknown(_) => ErrorKind::ProviderUnknown,
        }
    }

    /// The human-readable detail, without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            ProviderError::Timeout(d)
            | ProviderError::InvalidResponse(d)
            | ProviderError::Unknown(d) => d,
            ProviderError::RateLimited { detail, .. } => detail,
        }
    }

    /// Timeouts and rate limits are worth another attempt; a malformed
    /// response is not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout(_) | ProviderError::RateLimited { .. }
        )
    }
}

/// Failure of a conversation session operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::EmptyInput => ErrorKind::EmptyInput,
            SessionError::Provider(e) => e.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be at least {floor} (got {value})")]
    BelowFloor {
        field: &'static str,
        floor: f64,
        value: f64,
    },

    #[error("Unknown {field} '{value}', expected one of: {expected}")]
    UnknownVariant {
        field: &'static str,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to render: document text is empty")]
    EmptyInput,

    #[error("Rendering failed: {0}")]
    Failed(String),
}

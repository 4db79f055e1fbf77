use std::time::Duration;

use freelunch_config::{ConfigError, ModelId, ProviderKind};
use http::StatusCode;
use thiserror::Error;

/// Upstream response bodies are truncated to this many bytes in error
/// messages to keep them loggable
const BODY_CAP: usize = 512;

/// A classified failure from a single provider attempt
///
/// The classification drives diagnostics, not control flow: every provider
/// failure advances the chain to the next candidate, since a fatal
/// condition for one provider (a request shape it rejects, a revoked key)
/// says nothing about the next provider's viability. Raw reqwest or serde
/// errors never cross this boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider returned HTTP 429
    #[error("rate limited (http 429)")]
    RateLimited {
        /// Seconds until the limit resets, when the provider said so
        retry_after: Option<u64>,
    },

    /// The per-attempt deadline expired
    #[error("attempt timed out after {limit:?}")]
    Timeout {
        /// The deadline that was exceeded
        limit: Duration,
    },

    /// Transport-level failure (connect, DNS, reset)
    #[error("network error: {0}")]
    Network(String),

    /// Provider returned a server-side error (5xx or 408)
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status returned by the provider
        status: StatusCode,
        /// Truncated response body
        message: String,
    },

    /// Failure while decoding a streaming response
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Provider rejected the request shape (4xx other than 401/403/408/429)
    #[error("invalid request ({status}): {message}")]
    InvalidRequest {
        /// HTTP status returned by the provider
        status: StatusCode,
        /// Truncated response body
        message: String,
    },

    /// Provider rejected the credentials (401 or 403)
    #[error("authentication rejected ({status})")]
    Unauthorized {
        /// HTTP status returned by the provider
        status: StatusCode,
    },

    /// The provider's API key variable is not set
    #[error("no API key for {provider}: {var} is not set")]
    MissingCredentials {
        /// Provider that needed the key
        provider: ProviderKind,
        /// Environment variable that was consulted
        var: &'static str,
    },
}

impl ProviderError {
    /// Whether this failure is transient on the provider's side
    ///
    /// Retryable means a later identical request might succeed (rate
    /// limit, timeout, transient network or server failure). Fatal means
    /// the request or credentials are wrong for this provider.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::Network(_)
                | Self::Upstream { .. }
                | Self::Streaming(_)
        )
    }

    /// Classify a non-success HTTP response
    pub fn from_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        let message = truncate_body(body);
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited { retry_after }
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Unauthorized { status }
        } else if status == StatusCode::REQUEST_TIMEOUT || status.is_server_error() {
            Self::Upstream { status, message }
        } else {
            Self::InvalidRequest { status, message }
        }
    }

    /// Classify a reqwest transport failure
    ///
    /// The error is stripped of its URL so query strings can never leak
    /// into messages.
    pub fn from_transport(error: reqwest::Error, limit: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout { limit }
        } else {
            Self::Network(error.without_url().to_string())
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= BODY_CAP {
        return body.to_owned();
    }
    let mut end = BODY_CAP;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… ({} bytes total)", &body[..end], body.len())
}

/// One failed attempt within an exhausted chain, in configured order
#[derive(Debug)]
pub struct AttemptFailure {
    /// The candidate that was tried
    pub model: ModelId,
    /// Why it failed
    pub error: ProviderError,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.model, self.error)
    }
}

/// Errors surfaced to callers of a [`Menu`](crate::Menu) or chain
#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration failed to load or validate
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Requested capability is not in the menu
    #[error("unknown capability `{name}`")]
    UnknownCapability {
        /// The name that was requested
        name: String,
    },

    /// Every configured candidate failed
    #[error("all models exhausted for `{capability}`: [{}]", format_attempts(.attempts))]
    Exhausted {
        /// Capability whose chain was exhausted
        capability: String,
        /// Per-candidate failures in configured order
        attempts: Vec<AttemptFailure>,
    },

    /// The caller cancelled the in-flight call
    #[error("call cancelled")]
    Cancelled,
}

fn format_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

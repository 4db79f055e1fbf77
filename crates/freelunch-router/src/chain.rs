//! Capability chain: ordered model candidates with per-call failover

use std::sync::Arc;
use std::time::Duration;

use freelunch_config::{GenerationParams, ModelId};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::{AttemptFailure, ProviderError, RouterError};
use crate::provider::{ChatProvider, ChatStream};
use crate::types::{ChatRequest, ChatResponse};

/// One configured candidate within a chain
pub struct ModelEntry {
    id: ModelId,
    params: GenerationParams,
    adapter: Arc<dyn ChatProvider>,
}

impl ModelEntry {
    pub(crate) fn new(id: ModelId, params: GenerationParams, adapter: Arc<dyn ChatProvider>) -> Self {
        Self { id, params, adapter }
    }

    /// Merge configured params under the call-time overrides
    fn effective_request(&self, request: &ChatRequest) -> ChatRequest {
        let mut effective = request.clone();
        effective.params = self.params.merged_with(&request.params);
        effective
    }
}

/// Per-call options overriding the chain defaults
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Per-attempt timeout override
    pub timeout: Option<Duration>,
    /// Token cancelling the in-flight call
    pub cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Options with a per-attempt timeout override
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancellation: None,
        }
    }

    /// Options carrying a cancellation token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            timeout: None,
            cancellation: Some(token),
        }
    }
}

/// Ordered model candidates for one named capability
///
/// Every call walks the candidates from the top: failover state is
/// per-call, never remembered across calls. Any classified provider
/// failure, retryable or fatal, advances to the next candidate; only
/// exhaustion of the whole list fails the call. The configured timeout
/// bounds a single attempt, so a call may take up to N × timeout across
/// N candidates.
///
/// Chains hold no per-call mutable state and are safe to invoke from
/// concurrent callers.
pub struct CapabilityChain {
    name: String,
    timeout: Duration,
    entries: Vec<ModelEntry>,
}

impl CapabilityChain {
    pub(crate) fn new(name: String, timeout: Duration, entries: Vec<ModelEntry>) -> Self {
        Self { name, timeout, entries }
    }

    /// Capability name this chain serves
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured candidates in fallback priority order
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Invoke with chain defaults
    pub async fn invoke(&self, request: &ChatRequest) -> Result<ChatResponse, RouterError> {
        self.invoke_with(request, CallOptions::default()).await
    }

    /// Invoke, trying each candidate until one succeeds
    ///
    /// Returns the first successful normalized response; candidates after
    /// the one that succeeded are never attempted. Cancellation is
    /// terminal: it aborts the in-flight attempt without falling over.
    pub async fn invoke_with(&self, request: &ChatRequest, options: CallOptions) -> Result<ChatResponse, RouterError> {
        let timeout = options.timeout.unwrap_or(self.timeout);
        let cancellation = options.cancellation.unwrap_or_default();
        let mut attempts = Vec::new();

        for entry in &self.entries {
            let effective = entry.effective_request(request);

            let result = tokio::select! {
                () = cancellation.cancelled() => return Err(RouterError::Cancelled),
                result = entry.adapter.complete(&effective, timeout) => result,
            };

            match result {
                Ok(response) => {
                    tracing::debug!(
                        capability = %self.name,
                        model = %entry.id,
                        attempt = attempts.len() + 1,
                        "candidate succeeded"
                    );
                    return Ok(response);
                }
                Err(error) => {
                    tracing::warn!(
                        capability = %self.name,
                        model = %entry.id,
                        error = %error,
                        retryable = error.is_retryable(),
                        "candidate failed, advancing to next"
                    );
                    attempts.push(AttemptFailure {
                        model: entry.id.clone(),
                        error,
                    });
                }
            }
        }

        Err(RouterError::Exhausted {
            capability: self.name.clone(),
            attempts,
        })
    }

    /// Stream with chain defaults
    pub async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, RouterError> {
        self.stream_with(request, CallOptions::default()).await
    }

    /// Invoke the streaming variant with the same fallback policy
    ///
    /// Failover happens at stream initiation, and once more if the very
    /// first event is an error — nothing has reached the caller yet, so
    /// the next candidate can still serve the call. After any output has
    /// been returned, a stream failure surfaces as an `Err` item with no
    /// fallback: partial output cannot be un-sent.
    pub async fn stream_with(&self, request: &ChatRequest, options: CallOptions) -> Result<ChatStream, RouterError> {
        let timeout = options.timeout.unwrap_or(self.timeout);
        let cancellation = options.cancellation.unwrap_or_default();
        let mut attempts = Vec::new();

        for entry in &self.entries {
            let effective = entry.effective_request(request);

            let initiated = tokio::select! {
                () = cancellation.cancelled() => return Err(RouterError::Cancelled),
                result = entry.adapter.complete_stream(&effective, timeout) => result,
            };

            let mut stream = match initiated {
                Ok(stream) => stream,
                Err(error) => {
                    tracing::warn!(
                        capability = %self.name,
                        model = %entry.id,
                        error = %error,
                        "stream initiation failed, advancing to next"
                    );
                    attempts.push(AttemptFailure {
                        model: entry.id.clone(),
                        error,
                    });
                    continue;
                }
            };

            // Peek the first event before committing to this candidate
            let first = tokio::select! {
                () = cancellation.cancelled() => return Err(RouterError::Cancelled),
                event = stream.next() => event,
            };

            match first {
                Some(Ok(event)) => {
                    let replay = futures_util::stream::iter([Ok(event)]);
                    return Ok(Box::pin(replay.chain(stream)));
                }
                Some(Err(error)) => {
                    tracing::warn!(
                        capability = %self.name,
                        model = %entry.id,
                        error = %error,
                        "stream failed before first event, advancing to next"
                    );
                    attempts.push(AttemptFailure {
                        model: entry.id.clone(),
                        error,
                    });
                }
                None => {
                    attempts.push(AttemptFailure {
                        model: entry.id.clone(),
                        error: ProviderError::Streaming("stream ended before any output".to_owned()),
                    });
                }
            }
        }

        Err(RouterError::Exhausted {
            capability: self.name.clone(),
            attempts,
        })
    }
}

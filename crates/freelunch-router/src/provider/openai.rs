//! OpenAI-compatible provider adapter (Groq, OpenRouter)

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use http::header::HeaderMap;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChatProvider, ChatStream};
use crate::convert::openai::{build_request, chunk_to_events};
use crate::error::ProviderError;
use crate::protocol::openai::{OpenAiResponse, OpenAiStreamChunk};
use crate::types::{ChatRequest, ChatResponse, StreamEvent};
use freelunch_config::{ModelId, ProviderKind};

/// Groq OpenAI-compatible API base URL
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenRouter API base URL
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Adapter for OpenAI-compatible chat completion APIs
pub struct OpenAiCompatProvider {
    id: ModelId,
    display_id: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    default_headers: HeaderMap,
}

impl OpenAiCompatProvider {
    /// Create an adapter for one configured model candidate
    ///
    /// # Panics
    ///
    /// Panics if a hardcoded default base URL is invalid (should never
    /// happen).
    pub fn new(id: ModelId, base_url: Option<Url>, api_key: Option<SecretString>, default_headers: HeaderMap) -> Self {
        let base_url = base_url.unwrap_or_else(|| {
            let default = match id.provider {
                ProviderKind::OpenRouter => OPENROUTER_BASE_URL,
                _ => GROQ_BASE_URL,
            };
            Url::parse(default).expect("valid default URL")
        });

        Self {
            display_id: id.to_string(),
            id,
            client: Client::new(),
            base_url,
            api_key,
            default_headers,
        }
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// The configured API key, or the per-attempt failure for its absence
    fn require_api_key(&self) -> Result<&SecretString, ProviderError> {
        self.api_key.as_ref().ok_or(ProviderError::MissingCredentials {
            provider: self.id.provider,
            var: self.id.provider.credential_var(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn id(&self) -> &str {
        &self.display_id
    }

    async fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatResponse, ProviderError> {
        let api_key = self.require_api_key()?;
        let wire_request = build_request(&self.id.model, request, false);

        let response = self
            .client
            .post(self.completions_url())
            .json(&wire_request)
            .headers(self.default_headers.clone())
            .bearer_auth(api_key.expose_secret())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                let error = ProviderError::from_transport(e, timeout);
                tracing::error!(model = %self.display_id, error = %error, "upstream request failed");
                error
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.display_id, status = %status, "upstream returned error");
            return Err(ProviderError::from_status(status, retry_after, &body));
        }

        let wire_response: OpenAiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout { limit: timeout }
            } else {
                ProviderError::Upstream {
                    status,
                    message: format!("failed to parse response: {e}"),
                }
            }
        })?;

        let mut chat: ChatResponse = wire_response.into();
        chat.model.clone_from(&self.display_id);
        Ok(chat)
    }

    async fn complete_stream(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatStream, ProviderError> {
        let api_key = self.require_api_key()?;
        let wire_request = build_request(&self.id.model, request, true);

        let send = self
            .client
            .post(self.completions_url())
            .json(&wire_request)
            .headers(self.default_headers.clone())
            .bearer_auth(api_key.expose_secret())
            .send();

        // The timeout bounds initiation only; once deltas flow the stream
        // may legitimately outlive it
        let response = tokio::time::timeout(timeout, send)
            .await
            .map_err(|_| ProviderError::Timeout { limit: timeout })?
            .map_err(|e| {
                let error = ProviderError::from_transport(e, timeout);
                tracing::error!(model = %self.display_id, error = %error, "upstream stream request failed");
                error
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.display_id, status = %status, "upstream returned error");
            return Err(ProviderError::from_status(status, retry_after, &body));
        }

        let event_stream = response.bytes_stream().eventsource();

        let mapped = event_stream
            .map(|result| match result {
                Ok(event) => {
                    let data = event.data.trim().to_owned();
                    if data == "[DONE]" {
                        return vec![Ok(StreamEvent::Done)];
                    }

                    match serde_json::from_str::<OpenAiStreamChunk>(&data) {
                        Ok(chunk) => chunk_to_events(&chunk).into_iter().map(Ok).collect(),
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable SSE chunk");
                            vec![]
                        }
                    }
                }
                Err(e) => vec![Err(ProviderError::Streaming(e.to_string()))],
            })
            .flat_map(futures_util::stream::iter);

        Ok(Box::pin(mapped))
    }
}

/// Parse a numeric `Retry-After` header, when present
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(http::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

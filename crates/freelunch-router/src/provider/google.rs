//! Google Generative Language API provider adapter

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChatProvider, ChatStream};
use crate::convert::google::{build_request, chunk_to_events};
use crate::error::ProviderError;
use crate::protocol::google::GoogleResponse;
use crate::types::{ChatRequest, ChatResponse};
use freelunch_config::ModelId;

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Adapter for the Gemini `generateContent` API
///
/// The API key travels in the `x-goog-api-key` header rather than a query
/// parameter, so a transport error that echoes the URL can never carry it.
pub struct GoogleProvider {
    id: ModelId,
    display_id: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl GoogleProvider {
    /// Create an adapter for one configured model candidate
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never
    /// happen).
    pub fn new(id: ModelId, base_url: Option<Url>, api_key: Option<SecretString>) -> Self {
        let base_url = base_url.unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Self {
            display_id: id.to_string(),
            id,
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Build the `generateContent` endpoint URL
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.id.model)
    }

    /// Build the `streamGenerateContent` endpoint URL
    fn stream_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:streamGenerateContent?alt=sse", self.id.model)
    }

    fn require_api_key(&self) -> Result<&SecretString, ProviderError> {
        self.api_key.as_ref().ok_or(ProviderError::MissingCredentials {
            provider: self.id.provider,
            var: self.id.provider.credential_var(),
        })
    }
}

#[async_trait]
impl ChatProvider for GoogleProvider {
    fn id(&self) -> &str {
        &self.display_id
    }

    async fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatResponse, ProviderError> {
        let api_key = self.require_api_key()?;
        let wire_request = build_request(request);

        let response = self
            .client
            .post(self.generate_url())
            .json(&wire_request)
            .header("x-goog-api-key", api_key.expose_secret())
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
            let retry_after = super::openai::parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.display_id, status = %status, "upstream returned error");
            return Err(ProviderError::from_status(status, retry_after, &body));
        }

        let wire_response: GoogleResponse = response.json().await.map_err(|e| {
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
        // Fill in the model name that Google doesn't include in the response
        chat.model.clone_from(&self.display_id);
        Ok(chat)
    }

    async fn complete_stream(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatStream, ProviderError> {
        let api_key = self.require_api_key()?;
        let wire_request = build_request(request);

        let send = self
            .client
            .post(self.stream_url())
            .json(&wire_request)
            .header("x-goog-api-key", api_key.expose_secret())
            .send();

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
            let retry_after = super::openai::parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, retry_after, &body));
        }

        // Google streams SSE where each event is a complete response object
        let event_stream = response.bytes_stream().eventsource();

        let mapped = event_stream
            .map(|result| match result {
                Ok(event) => {
                    let data = event.data.trim().to_owned();
                    if data.is_empty() {
                        return vec![];
                    }

                    match serde_json::from_str::<GoogleResponse>(&data) {
                        Ok(chunk) => chunk_to_events(&chunk).into_iter().map(Ok).collect(),
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable Google SSE chunk");
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

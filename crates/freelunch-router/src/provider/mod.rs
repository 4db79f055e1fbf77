//! Provider adapters normalizing each backend behind one chat interface

pub mod google;
pub mod openai;

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use freelunch_config::{Credentials, ModelSpec, ProviderKind, ProviderSettings};
use futures_util::Stream;
use http::header::{HeaderMap, HeaderValue};

use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResponse, StreamEvent};

/// Stream of normalized events from a streaming completion
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ProviderError>> + Send>>;

/// Uniform invocation contract implemented by every provider adapter
///
/// Adapters own all provider specifics: request formatting, response
/// parsing, authentication, and error classification. They hold no
/// per-call mutable state, so one adapter may serve concurrent calls.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// The `provider::model` identifier this adapter serves
    fn id(&self) -> &str;

    /// Send a non-streaming completion request
    ///
    /// `timeout` bounds the whole attempt and is enforced on the HTTP
    /// request itself, not merely checked afterwards.
    async fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatResponse, ProviderError>;

    /// Send a streaming completion request
    ///
    /// `timeout` bounds stream initiation (connection and response
    /// headers); it does not cut off a stream that is delivering output.
    async fn complete_stream(&self, request: &ChatRequest, timeout: Duration) -> Result<ChatStream, ProviderError>;
}

/// Build the adapter for a configured model candidate
///
/// The API key is resolved here, on first use of the capability; a missing
/// key is not an error until the adapter is actually invoked.
pub fn build(
    spec: &ModelSpec,
    settings: Option<&ProviderSettings>,
    credentials: &Credentials,
) -> Arc<dyn ChatProvider> {
    let api_key = credentials.resolve(spec.id.provider);
    let base_url = settings.and_then(|s| s.base_url.clone());

    match spec.id.provider {
        ProviderKind::Groq => Arc::new(openai::OpenAiCompatProvider::new(
            spec.id.clone(),
            base_url,
            api_key,
            HeaderMap::new(),
        )),
        ProviderKind::OpenRouter => Arc::new(openai::OpenAiCompatProvider::new(
            spec.id.clone(),
            base_url,
            api_key,
            openrouter_headers(),
        )),
        ProviderKind::Google => Arc::new(google::GoogleProvider::new(spec.id.clone(), base_url, api_key)),
    }
}

/// Attribution headers OpenRouter asks free-tier apps to send
fn openrouter_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "http-referer",
        HeaderValue::from_static("https://github.com/freelunch-dev/freelunch"),
    );
    headers.insert("x-title", HeaderValue::from_static("freelunch"));
    headers
}

//! Mock provider backend for integration tests
//!
//! Serves a minimal OpenAI-compatible chat completions API plus a Gemini
//! `generateContent` endpoint, with scripted failure injection and atomic
//! request counters.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Mock backend returning predictable responses
pub struct MockProvider {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    completion_count: AtomicU32,
    stream_count: AtomicU32,
    /// Number of requests to fail before succeeding (`u32::MAX` = always)
    fail_count: AtomicU32,
    fail_status: StatusCode,
    /// Delay applied before every response
    delay: Option<Duration>,
    /// Kill the connection after the first streamed delta
    abort_mid_stream: bool,
    response_content: String,
}

/// Scripted behavior for a [`MockProvider`]
pub struct MockBehavior {
    fail_count: u32,
    fail_status: StatusCode,
    delay: Option<Duration>,
    abort_mid_stream: bool,
    response_content: String,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            fail_count: 0,
            fail_status: StatusCode::INTERNAL_SERVER_ERROR,
            delay: None,
            abort_mid_stream: false,
            response_content: "Hello from mock provider".to_owned(),
        }
    }
}

impl MockBehavior {
    /// Respond with this content
    #[must_use]
    pub fn response(mut self, content: &str) -> Self {
        self.response_content = content.to_owned();
        self
    }

    /// Fail the first `n` requests with the given status
    #[must_use]
    pub fn fail_first(mut self, n: u32, status: StatusCode) -> Self {
        self.fail_count = n;
        self.fail_status = status;
        self
    }

    /// Fail every request with the given status
    #[must_use]
    pub fn always_fail(self, status: StatusCode) -> Self {
        self.fail_first(u32::MAX, status)
    }

    /// Sleep before every response
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Drop the connection after the first streamed delta
    #[must_use]
    pub const fn abort_mid_stream(mut self) -> Self {
        self.abort_mid_stream = true;
        self
    }

    /// Start a mock provider with this behavior
    pub async fn start(self) -> anyhow::Result<MockProvider> {
        MockProvider::start_inner(self).await
    }
}

impl MockProvider {
    /// Start a mock that always succeeds
    pub async fn start() -> anyhow::Result<Self> {
        MockBehavior::default().start().await
    }

    /// Start a mock with a custom response content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        MockBehavior::default().response(content).start().await
    }

    /// Start a mock that always fails with the given status
    pub async fn start_failing(status: StatusCode) -> anyhow::Result<Self> {
        MockBehavior::default().always_fail(status).start().await
    }

    async fn start_inner(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            completion_count: AtomicU32::new(0),
            stream_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(behavior.fail_count),
            fail_status: behavior.fail_status,
            delay: behavior.delay,
            abort_mid_stream: behavior.abort_mid_stream,
            response_content: behavior.response_content,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1beta/models/{*model_op}", routing::post(handle_generate_content))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for OpenAI-compatible providers (groq, openrouter)
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Base URL for the Google provider
    pub fn google_base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of non-streaming completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    /// Number of streaming completion requests received
    pub fn stream_count(&self) -> u32 {
        self.state.stream_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Consume one scripted failure, if any remain
fn take_failure(state: &MockState) -> Option<StatusCode> {
    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining == 0 {
        return None;
    }
    if remaining != u32::MAX {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
    }
    Some(state.fail_status)
}

fn error_body(status: StatusCode) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "error": {
            "message": "mock provider scripted failure",
            "type": "server_error",
            "code": status.as_u16(),
        }
    }))
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    Json(request): Json<serde_json::Value>,
) -> axum::response::Response {
    let is_stream = request["stream"].as_bool().unwrap_or(false);
    if is_stream {
        state.stream_count.fetch_add(1, Ordering::Relaxed);
    } else {
        state.completion_count.fetch_add(1, Ordering::Relaxed);
    }

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = take_failure(&state) {
        return (status, error_body(status)).into_response();
    }

    let model = request["model"].as_str().unwrap_or("mock-model").to_owned();

    if is_stream {
        return streaming_response(&state, &model);
    }

    Json(serde_json::json!({
        "id": "chatcmpl-mock-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": state.response_content.clone(),
            },
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .into_response()
}

/// Build an SSE streaming response, one delta per word
fn streaming_response(state: &MockState, model: &str) -> axum::response::Response {
    let chunk = |delta: serde_json::Value, finish: Option<&str>| {
        serde_json::json!({
            "id": "chatcmpl-mock-stream",
            "object": "chat.completion.chunk",
            "created": 1_700_000_000,
            "model": model,
            "choices": [{"index": 0, "delta": delta, "finish_reason": finish}]
        })
    };

    let headers = [(axum::http::header::CONTENT_TYPE, "text/event-stream")];

    if state.abort_mid_stream {
        // One real delta, then the connection dies
        let first = chunk(serde_json::json!({"role": "assistant", "content": "partial "}), None);
        let body_stream = futures_util::stream::unfold(0u8, move |step| {
            let first = first.clone();
            async move {
                match step {
                    0 => Some((Ok(format!("data: {first}\n\n").into_bytes()), 1)),
                    1 => {
                        // Let the first frame reach the client before killing the connection
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Some((Err(std::io::Error::other("mock mid-stream abort")), 2))
                    }
                    _ => None,
                }
            }
        });
        return (headers, axum::body::Body::from_stream(body_stream)).into_response();
    }

    let mut body = String::new();
    let role_chunk = chunk(serde_json::json!({"role": "assistant", "content": ""}), None);
    body.push_str(&format!("data: {role_chunk}\n\n"));

    for word in state.response_content.split_whitespace() {
        let delta = chunk(serde_json::json!({"content": format!("{word} ")}), None);
        body.push_str(&format!("data: {delta}\n\n"));
    }

    let finish = chunk(serde_json::json!({}), Some("stop"));
    body.push_str(&format!("data: {finish}\n\n"));
    body.push_str("data: [DONE]\n\n");

    (headers, body).into_response()
}

async fn handle_generate_content(
    State(state): State<Arc<MockState>>,
    Json(_request): Json<serde_json::Value>,
) -> axum::response::Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = take_failure(&state) {
        return (status, error_body(status)).into_response();
    }

    Json(serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": state.response_content.clone()}]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 5,
            "totalTokenCount": 15
        }
    }))
    .into_response()
}

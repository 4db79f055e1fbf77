mod harness;

use freelunch_config::ProviderKind;
use freelunch_router::{ChatRequest, ProviderError, StreamEvent};
use futures_util::StreamExt;
use harness::config::ConfigBuilder;
use harness::mock_provider::{MockBehavior, MockProvider};
use http::StatusCode;

/// Collect a stream, returning (joined text, saw Done, first error if any)
async fn drain(stream: freelunch_router::ChatStream) -> (String, bool, Option<ProviderError>) {
    let events: Vec<_> = stream.collect().await;

    let mut text = String::new();
    let mut done = false;
    let mut error = None;

    for event in events {
        match event {
            Ok(StreamEvent::Delta(delta)) => {
                if let Some(content) = delta.content {
                    text.push_str(&content);
                }
            }
            Ok(StreamEvent::Done) => done = true,
            Ok(StreamEvent::Usage(_)) => {}
            Err(e) => {
                error = Some(e);
                break;
            }
        }
    }

    (text, done, error)
}

#[tokio::test]
async fn stream_delivers_deltas_and_done() {
    let provider = MockProvider::start_with_response("hello streaming world").await.unwrap();

    let menu = ConfigBuilder::new("fast")
        .with_provider(ProviderKind::Groq, &provider.base_url())
        .with_model("groq::mock-model-1")
        .build_menu();

    let chain = menu.capability("fast").unwrap();
    let stream = chain.stream(&ChatRequest::from_prompt("Hello")).await.unwrap();
    let (text, done, error) = drain(stream).await;

    assert_eq!(text.trim_end(), "hello streaming world");
    assert!(done);
    assert!(error.is_none());
    assert_eq!(provider.stream_count(), 1);
}

#[tokio::test]
async fn stream_initiation_failure_falls_over() {
    let failing = MockBehavior::default()
        .always_fail(StatusCode::TOO_MANY_REQUESTS)
        .start()
        .await
        .unwrap();
    let backup = MockProvider::start_with_response("backup stream").await.unwrap();

    let menu = ConfigBuilder::new("fast")
        .with_provider(ProviderKind::Groq, &failing.base_url())
        .with_provider(ProviderKind::OpenRouter, &backup.base_url())
        .with_model("groq::mock-model-1")
        .with_model("openrouter::mock-model-1")
        .build_menu();

    let chain = menu.capability("fast").unwrap();
    let stream = chain.stream(&ChatRequest::from_prompt("Hello")).await.unwrap();
    let (text, done, error) = drain(stream).await;

    assert_eq!(text.trim_end(), "backup stream");
    assert!(done);
    assert!(error.is_none());
    assert_eq!(failing.stream_count(), 1);
    assert_eq!(backup.stream_count(), 1);
}

#[tokio::test]
async fn mid_stream_failure_is_hard_no_fallback() {
    let aborting = MockBehavior::default().abort_mid_stream().start().await.unwrap();
    let backup = MockProvider::start_with_response("never used").await.unwrap();

    let menu = ConfigBuilder::new("fast")
        .with_provider(ProviderKind::Groq, &aborting.base_url())
        .with_provider(ProviderKind::OpenRouter, &backup.base_url())
        .with_model("groq::mock-model-1")
        .with_model("openrouter::mock-model-1")
        .build_menu();

    let chain = menu.capability("fast").unwrap();
    let stream = chain.stream(&ChatRequest::from_prompt("Hello")).await.unwrap();
    let (text, done, error) = drain(stream).await;

    // Partial output reached the caller, then the failure surfaced as-is
    assert_eq!(text, "partial ");
    assert!(!done);
    assert!(matches!(error, Some(ProviderError::Streaming(_))));

    // Partial output cannot be un-sent: no second candidate is tried
    assert_eq!(backup.stream_count(), 0);
}

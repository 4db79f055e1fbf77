mod harness;

use std::io::Write;

use freelunch_router::{ChatRequest, Menu, RouterError};
use harness::mock_provider::MockProvider;

#[tokio::test]
async fn menu_file_end_to_end() {
    let provider = MockProvider::start_with_response("lunch is served").await.unwrap();

    let mut menu_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        menu_file,
        r#"
        [providers.groq]
        base_url = "{}"

        [capabilities.fast]
        type = "chat"
        timeout = "10s"

        [[capabilities.fast.models]]
        id = "groq::mock-model-1"
        params = {{ temperature = 0.2 }}
        "#,
        provider.base_url()
    )
    .unwrap();

    let mut env_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(env_file, "GROQ_API_KEY=env-file-key").unwrap();

    let menu = Menu::load_with_env(menu_file.path(), env_file.path()).unwrap();

    let names: Vec<&str> = menu.capabilities().collect();
    assert_eq!(names, ["fast"]);

    let chain = menu.capability("fast").unwrap();
    let response = chain.invoke(&ChatRequest::from_prompt("Hello")).await.unwrap();
    assert_eq!(response.content, "lunch is served");
    assert_eq!(response.model, "groq::mock-model-1");
}

#[tokio::test]
async fn unknown_capability_is_immediate() {
    let provider = MockProvider::start().await.unwrap();

    let mut menu_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        menu_file,
        r#"
        [providers.groq]
        base_url = "{}"

        [capabilities.fast]
        type = "chat"
        models = [{{ id = "groq::mock-model-1" }}]
        "#,
        provider.base_url()
    )
    .unwrap();

    let menu = Menu::load(menu_file.path()).unwrap();
    let err = menu.capability("story_teller").unwrap_err();

    assert!(matches!(err, RouterError::UnknownCapability { .. }));
    assert_eq!(provider.completion_count(), 0);
}

// OpenAI wire format tests against a local mock server

use mockito::Matcher;
use oakbot::config::ProviderConfig;
use oakbot::conversation::Message;
use oakbot::delegate::{CompletionDelegate, Knowledge};
use oakbot::providers::{LlmProvider, OpenAIProvider, ProviderRequest};
use serde_json::json;
use std::time::Duration;

fn provider_for(server: &mockito::ServerGuard) -> OpenAIProvider {
    OpenAIProvider::new(
        "sk-test".to_string(),
        server.url(),
        "gpt-3.5-turbo".to_string(),
        Duration::from_secs(5),
    )
    .expect("provider")
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo-0125",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_sends_chat_completion_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hello"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Hi there!"))
        .create_async()
        .await;

    let request = ProviderRequest::new(vec![Message::system("be brief"), Message::user("hello")])
        .with_temperature(0.0);
    let response = provider_for(&server).send_message(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), "Hi there!");
    assert_eq!(response.model, "gpt-3.5-turbo-0125");
    assert_eq!(response.stop_reason.as_deref(), Some("stop"));
    assert_eq!(response.provider, "openai");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let request = ProviderRequest::new(vec![Message::user("hello")]);
    let err = provider_for(&server)
        .send_message(&request)
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("401"), "{}", msg);
    assert!(msg.contains("Incorrect API key provided"), "{}", msg);
}

#[tokio::test]
async fn test_empty_choices_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "x", "model": "m", "choices": []}"#)
        .create_async()
        .await;

    let request = ProviderRequest::new(vec![Message::user("hello")]);
    let result = provider_for(&server).send_message(&request).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_delegate_from_config_sends_knowledge_prompt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-config")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "gpt-4o-mini", "temperature": 0.0})),
            Matcher::Regex("cooperative education".to_string()),
            Matcher::Regex("Where can I study late".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Snell Library is open 24/7 during the semester."))
        .create_async()
        .await;

    let config = ProviderConfig {
        api_key: Some("sk-config".to_string()),
        model: "gpt-4o-mini".to_string(),
        base_url: server.url(),
        ..Default::default()
    };

    let status = CompletionDelegate::initialize(&config, Knowledge::default());
    let delegate = status.delegate().expect("delegate ready");
    assert_eq!(delegate.model(), "gpt-4o-mini");

    let reply = delegate
        .complete(&[], "Where can I study late at night?")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(reply, "Snell Library is open 24/7 during the semester.");
}

#[test]
fn test_missing_key_leaves_delegate_unavailable() {
    let status = CompletionDelegate::initialize(&ProviderConfig::default(), Knowledge::default());

    assert!(!status.is_ready());
    match status {
        oakbot::delegate::DelegateStatus::Unavailable { reason } => {
            assert!(reason.contains("API key is missing"));
        }
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

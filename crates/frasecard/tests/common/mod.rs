//! Common test utilities for backend client tests.

use frasecard::{ImageSearchClient, LlmClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create an LLM client pointed at the mock server.
#[allow(dead_code)]
pub fn llm_for_mock(server: &MockServer) -> LlmClient {
    LlmClient::builder()
        .url(server.uri())
        .api_key("test-key")
        .build()
}

/// Create a search client pointed at the mock server.
#[allow(dead_code)] // Not all test files use this
pub fn search_for_mock(server: &MockServer) -> ImageSearchClient {
    ImageSearchClient::builder()
        .url(format!("{}/customsearch/v1", server.uri()))
        .api_key("test-key")
        .engine_id("test-cx")
        .build()
}

/// Create a chat completion response with a single answer.
#[allow(dead_code)]
pub fn mock_completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

/// Mount a completion mock expecting exactly one call whose user message
/// matches `input`.
#[allow(dead_code)]
pub async fn mock_prompt(server: &MockServer, input: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{"role": "system"}, {"role": "user", "content": input}]
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

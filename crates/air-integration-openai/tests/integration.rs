//! End-to-end tests against a mock AIR gateway

mod common;

use std::time::Duration;

use air::{AirError, CompletionPayload, HasEndpoint};
use air_client::GatewayConfig;
use air_integration_openai::{
    air_chat_model, air_openai, air_wrap, OpenAiClient, OpenAiConfig, INTEGRATION_NAME,
};
use common::MockGateway;
use serde_json::json;

#[tokio::test]
async fn test_chat_model_records_episode() {
    let gateway = MockGateway::start().await;
    let config = GatewayConfig::new(&gateway.url).with_api_key("sk-test");
    let llm = air_chat_model("gpt-4o-mini", &config).unwrap();

    let result = llm.invoke("What is a flight recorder?").await.unwrap();
    assert_eq!(result.output_texts(), vec!["Recorded".to_string()]);

    let chats = gateway.chats();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0]["model"], "gpt-4o-mini");
    assert_eq!(chats[0]["messages"][0]["role"], "user");
    assert_eq!(gateway.authorizations(), vec!["Bearer sk-test".to_string()]);

    let episodes = gateway.wait_for_episodes(1).await;
    let episode = &episodes[0];
    assert_eq!(episode["agent_id"], INTEGRATION_NAME);
    assert_eq!(episode["task"], "What is a flight recorder?");
    assert_eq!(episode["status"], "completed");
    assert_eq!(episode["steps"][0]["type"], "llm_call");
    assert_eq!(episode["steps"][0]["model"], "gpt-4o-mini");
    assert_eq!(episode["steps"][0]["input"], json!(["What is a flight recorder?"]));
    assert_eq!(episode["steps"][0]["output"], json!(["Recorded"]));
}

#[tokio::test]
async fn test_chat_model_options_reach_gateway() {
    let gateway = MockGateway::start().await;
    let llm = air_chat_model("gpt-4o", &GatewayConfig::new(&gateway.url))
        .unwrap()
        .with_option("temperature", json!(0.2));

    llm.invoke("hi").await.unwrap();

    let chats = gateway.chats();
    assert_eq!(chats[0]["model"], "gpt-4o");
    assert_eq!(chats[0]["temperature"], json!(0.2));
}

#[tokio::test]
async fn test_upstream_failure_surfaces_without_episode() {
    let gateway = MockGateway::with_failing_upstream().await;
    let llm = air_chat_model("gpt-4o-mini", &GatewayConfig::new(&gateway.url)).unwrap();

    let err = llm.invoke("hi").await.unwrap_err();
    assert!(matches!(err, AirError::GatewayRequest { status: 502, .. }));
    assert_eq!(err.status(), Some(502));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(gateway.episodes().is_empty());
}

#[tokio::test]
async fn test_air_openai_talks_to_gateway() {
    let gateway = MockGateway::start().await;
    let client = air_openai(&GatewayConfig::new(&gateway.url).with_api_key("sk-direct")).unwrap();

    let body = client
        .chat_completion(&json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "ping"}],
        }))
        .await
        .unwrap();

    assert_eq!(body["choices"][0]["message"]["content"], "Recorded");
    assert_eq!(gateway.authorizations(), vec!["Bearer sk-direct".to_string()]);
    // Plain clients are redirected but carry no callbacks
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(gateway.episodes().is_empty());
}

#[tokio::test]
async fn test_air_wrap_redirects_existing_client() {
    let gateway = MockGateway::start().await;
    let mut client = OpenAiClient::new(OpenAiConfig::new("sk-wrapped")).unwrap();
    assert_eq!(client.base_url(), "https://api.openai.com/v1");

    air_wrap(&mut client, &GatewayConfig::new(&gateway.url)).unwrap();
    assert_eq!(client.base_url(), format!("{}/v1", gateway.url));

    client
        .chat_completion(&json!({"model": "gpt-4o-mini", "messages": []}))
        .await
        .unwrap();
    assert_eq!(gateway.chats().len(), 1);
}

//! Shared test utilities: a mock AIR gateway bound to an ephemeral port

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Default)]
struct GatewayState {
    fail_chat: bool,
    authorizations: Mutex<Vec<String>>,
    chats: Mutex<Vec<Value>>,
    episodes: Mutex<Vec<Value>>,
}

pub struct MockGateway {
    pub url: String,
    state: Arc<GatewayState>,
}

impl MockGateway {
    pub async fn start() -> Self {
        Self::with_state(GatewayState::default()).await
    }

    /// Chat completions answer `502 upstream unavailable`
    pub async fn with_failing_upstream() -> Self {
        Self::with_state(GatewayState {
            fail_chat: true,
            ..Default::default()
        })
        .await
    }

    async fn with_state(state: GatewayState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/v1/chat/completions", post(chat))
            .route("/v1/episodes", post(episodes))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn chats(&self) -> Vec<Value> {
        self.state.chats.lock().unwrap().clone()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.state.authorizations.lock().unwrap().clone()
    }

    pub fn episodes(&self) -> Vec<Value> {
        self.state.episodes.lock().unwrap().clone()
    }

    /// Poll until at least `count` episodes arrived
    pub async fn wait_for_episodes(&self, count: usize) -> Vec<Value> {
        for _ in 0..100 {
            let episodes = self.episodes();
            if episodes.len() >= count {
                return episodes;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("gateway did not receive {count} episode(s)");
    }
}

async fn chat(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorizations.lock().unwrap().push(auth.to_string());
    }
    state.chats.lock().unwrap().push(body.clone());

    if state.fail_chat {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "upstream unavailable"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": body["model"],
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Recorded"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 6, "completion_tokens": 1, "total_tokens": 7}
        })),
    )
}

async fn episodes(State(state): State<Arc<GatewayState>>, Json(body): Json<Value>) -> StatusCode {
    state.episodes.lock().unwrap().push(body);
    StatusCode::ACCEPTED
}

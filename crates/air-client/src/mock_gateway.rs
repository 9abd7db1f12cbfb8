//! In-process stand-in for the AIR gateway, bound to an ephemeral port

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct MockState {
    run_id: Option<String>,
    chats: Mutex<Vec<CapturedRequest>>,
    episodes: Mutex<Vec<Value>>,
}

pub struct MockGateway {
    pub url: String,
    state: Arc<MockState>,
}

impl MockGateway {
    /// Gateway that answers every route successfully
    pub async fn start(run_id: Option<&str>) -> Self {
        let state = Arc::new(MockState {
            run_id: run_id.map(str::to_string),
            ..Default::default()
        });

        let app = Router::new()
            .route("/health", get(health))
            .route("/v1/chat/completions", post(chat))
            .route("/v1/audit", get(audit))
            .route("/v1/audit/export", get(export))
            .route("/v1/episodes", post(episodes))
            .with_state(Arc::clone(&state));

        Self::serve(app, state).await
    }

    /// Gateway that answers every route with `500 boom`
    pub async fn failing() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") });
        Self::serve(app, state).await
    }

    async fn serve(app: Router, state: Arc<MockState>) -> Self {
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

    pub fn chat_requests(&self) -> Vec<CapturedRequest> {
        self.state.chats.lock().unwrap().clone()
    }

    pub fn episodes(&self) -> Vec<Value> {
        self.state.episodes.lock().unwrap().clone()
    }
}

fn capture(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "version": "test"}))
}

async fn chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.chats.lock().unwrap().push(CapturedRequest {
        headers: capture(&headers),
        body,
    });

    let mut response_headers = HeaderMap::new();
    if let Some(run_id) = &state.run_id {
        response_headers.insert("x-run-id", run_id.parse().unwrap());
    }

    (
        response_headers,
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}
            ]
        })),
    )
}

async fn audit(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "chain_length": 42,
        "authenticated": headers.contains_key("x-gateway-key"),
    }))
}

async fn export(headers: HeaderMap) -> impl IntoResponse {
    if !headers.contains_key("x-gateway-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "missing key"})));
    }
    (StatusCode::OK, Json(json!({"records": [], "signature": "sig-abc"})))
}

async fn episodes(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> StatusCode {
    state.episodes.lock().unwrap().push(body);
    StatusCode::ACCEPTED
}

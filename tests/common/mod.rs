#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TEST_KEY: &str = "test-key";

#[derive(Clone)]
pub struct FakeReply {
    pub status: StatusCode,
    pub body: String,
}

impl FakeReply {
    pub fn text(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: candidate_body(text),
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Serves a stand-in for the generateContent endpoint and returns its base URL.
pub async fn spawn_fake_gemini(reply: FakeReply) -> String {
    let app = Router::new()
        .route("/v1/models/:call", post(generate))
        .with_state(reply);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn generate(
    State(reply): State<FakeReply>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_KEY) {
        return (StatusCode::UNAUTHORIZED, "missing api key".into());
    }
    if !call.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, format!("unknown call {call}"));
    }
    let config = &body["generationConfig"];
    if config["maxOutputTokens"] != 300 || body["contents"][0]["parts"][0]["text"].is_null() {
        return (StatusCode::BAD_REQUEST, format!("unexpected body {body}"));
    }
    (reply.status, reply.body)
}

/// A loopback address with nothing listening on it.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn samples_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/samples.json")
}

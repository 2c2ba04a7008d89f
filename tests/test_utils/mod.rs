//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Router, body::Body, http::Response};
use serde_json::json;

use spark::ai::chat::{AdapterError, ModelClient, ModelSession, ModelSessionHandle, Turn};
use spark::api::{AppState, SharedState, app};
use spark::core::AppConfig;
use spark::gemini::GeminiClient;

pub const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Creates a test application router whose model client talks to
/// `gemini_url`, usually a `mockito` server. The shared state is
/// returned too so tests can inspect sessions directly.
pub fn test_app(gemini_url: &str) -> (Router, SharedState) {
    let config = test_config(gemini_url);
    let model = Arc::new(GeminiClient::from_config(&config));
    test_app_with_model(config, model)
}

/// Creates a test application router around any model client.
pub fn test_app_with_model(
    config: AppConfig,
    model: Arc<dyn ModelClient>,
) -> (Router, SharedState) {
    let state = Arc::new(RwLock::new(AppState::new(config, model)));
    (app(Arc::clone(&state)), state)
}

pub fn test_config(gemini_url: &str) -> AppConfig {
    AppConfig {
        gemini_api_key: String::from("test-api-key"),
        gemini_api_hostname: gemini_url.to_string(),
        gemini_model: String::from("gemini-1.5-flash"),
        request_timeout: Duration::from_secs(5),
        session_idle_timeout: Duration::from_secs(60),
    }
}

/// A model client that takes `delay` to answer every message.
pub struct SlowClient {
    delay: Duration,
}

impl SlowClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ModelClient for SlowClient {
    fn create(&self, _system_instruction: &str) -> ModelSessionHandle {
        Box::new(SlowChat {
            delay: self.delay,
            history: Vec::new(),
        })
    }
}

struct SlowChat {
    delay: Duration,
    history: Vec<Turn>,
}

#[async_trait]
impl ModelSession for SlowChat {
    async fn send(&mut self, text: &str) -> Result<String, AdapterError> {
        tokio::time::sleep(self.delay).await;
        let reply = String::from("Eventually. Please consult a qualified doctor.");
        self.history.push(Turn::user(text));
        self.history.push(Turn::assistant(&reply));
        Ok(reply)
    }

    fn history(&self) -> &[Turn] {
        &self.history
    }
}

/// A successful `generateContent` response body.
pub fn gemini_reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }]
    })
    .to_string()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `name=value` pair of the session cookie set by a response.
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get("set-cookie")
        .expect("Missing session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

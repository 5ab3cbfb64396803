//! Common test utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use line_client::{LineClient, SignatureVerifier, SIGNATURE_HEADER};
use report_bot::{
    api::{create_router, AppState},
    catalog::{default_presets, default_units},
    Bot, MatchPolicy, Notifier,
};
use report_store::ReportStore;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHANNEL_SECRET: &str = "test-channel-secret";
pub const REPLY_PATH: &str = "/v2/bot/message/reply";
pub const PUSH_PATH: &str = "/v2/bot/message/push";

/// Router wired to an in-memory store and a mock LINE API.
pub struct TestApp {
    pub app: Router,
    pub store: ReportStore,
    pub line: MockServer,
}

pub struct TestOptions {
    pub verify_signature: bool,
    pub notify_api_key: Option<String>,
    pub policy: MatchPolicy,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            verify_signature: true,
            notify_api_key: None,
            policy: MatchPolicy::FirstMatch,
        }
    }
}

/// Start a mock LINE API that accepts replies and pushes and knows every
/// user as "Tester".
pub async fn mock_line_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/bot/profile/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "U-any",
            "displayName": "Tester",
            "pictureUrl": "https://profile.line-scdn.net/tester"
        })))
        .mount(&server)
        .await;

    server
}

pub async fn test_app() -> TestApp {
    test_app_with(TestOptions::default()).await
}

pub async fn test_app_with(options: TestOptions) -> TestApp {
    let store = ReportStore::memory();
    store.seed_units(&default_units()).await.unwrap();
    test_app_with_store(store, options).await
}

pub async fn test_app_with_store(store: ReportStore, options: TestOptions) -> TestApp {
    let line = mock_line_server().await;
    let client = LineClient::new(line.uri(), "test-token", Duration::from_secs(5)).unwrap();

    let bot = Bot::new(client.clone(), store.clone(), default_presets(), options.policy);
    let notifier = Notifier::new(store.clone(), client);
    let verifier = options
        .verify_signature
        .then(|| SignatureVerifier::new(CHANNEL_SECRET));
    let state = AppState::new(bot, notifier, verifier, options.notify_api_key);

    TestApp {
        app: create_router(state),
        store,
        line,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// POST a correctly signed webhook delivery.
    pub async fn webhook(&self, body: &Value) -> Response<Body> {
        self.send(signed_webhook(body)).await
    }

    /// Deliver a text message from `user_id`.
    pub async fn say(&self, user_id: &str, text: &str) -> Response<Body> {
        self.webhook(&deliveries(vec![text_event(user_id, text)])).await
    }

    /// Bodies of every reply sent so far.
    pub async fn replies(&self) -> Vec<Value> {
        self.requests_to(REPLY_PATH).await
    }

    pub async fn pushes(&self) -> Vec<Value> {
        self.requests_to(PUSH_PATH).await
    }

    async fn requests_to(&self, request_path: &str) -> Vec<Value> {
        self.line
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// Text of the first message in the most recent reply.
    pub async fn last_reply_text(&self) -> String {
        let replies = self.replies().await;
        let last = replies.last().expect("no reply sent");
        last["messages"][0]["text"].as_str().unwrap_or_default().to_string()
    }
}

pub fn deliveries(events: Vec<Value>) -> Value {
    json!({
        "destination": "Ubot",
        "events": events
    })
}

pub fn text_event(user_id: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": format!("reply-{}", user_id),
        "source": {"type": "user", "userId": user_id},
        "message": {"type": "text", "id": "m1", "text": text}
    })
}

pub fn signed_webhook(body: &Value) -> Request<Body> {
    let raw = serde_json::to_vec(body).unwrap();
    let signature = SignatureVerifier::new(CHANNEL_SECRET).sign(&raw).unwrap();

    Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(raw))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

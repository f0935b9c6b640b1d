#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use armis_api::config::ServerConfig;
use armis_api::router::build_app_router;
use armis_api::state::AppState;
use armis_core::reading::FieldAliases;
use armis_core::risk::RiskPolicy;
use armis_core::triggers::TriggerThresholds;
use armis_events::{AlertDispatcher, NotifyError, Notifier};

pub const TEST_TOKEN: &str = "test-dashboard-token";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// no dashboard token and the weighted risk policy.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        notify_timeout_secs: 5,
        dashboard_token: None,
        risk_policy: RiskPolicy::weighted(),
        trigger_thresholds: TriggerThresholds::default(),
        field_aliases: FieldAliases::default(),
    }
}

/// Notifier that forwards every alert into a channel the test can read.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<(String, String)>,
}

#[async_trait]
impl Notifier for ChannelNotifier {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.tx
            .send((subject.to_string(), body.to_string()))
            .map_err(|e| NotifyError::Other(e.to_string()))
    }
}

/// An app whose alerts land in the returned receiver.
pub fn build_test_app_with_channel(
    config: ServerConfig,
) -> (Router, mpsc::UnboundedReceiver<(String, String)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = AlertDispatcher::new(
        vec![std::sync::Arc::new(ChannelNotifier { tx })],
        Duration::from_secs(5),
    );
    (build_app_router(AppState::new(config, dispatcher)), rx)
}

/// An app with no notifier configured.
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app_router(AppState::new(config, AlertDispatcher::disabled()))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    post_raw(app, uri, json.to_string()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Wait for the next background alert, failing the test after two seconds.
pub async fn next_alert(rx: &mut mpsc::UnboundedReceiver<(String, String)>) -> (String, String) {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for alert")
        .expect("alert channel closed")
}

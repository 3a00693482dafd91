//! Webhook Notifier Unit Tests
//!
//! Uses wiremock to test:
//! - Request formatting and JSON escaping
//! - Status handling
//! - Missing URL handling
//! - Reconfiguration

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::DiscordConfig;
use crate::core::error::WatchdogError;
use crate::core::webhook::{Notifier, WebhookNotifier};

fn config_for(server: &MockServer) -> DiscordConfig {
    DiscordConfig {
        webhook_url: format!("{}/webhook", server.uri()),
        ..DiscordConfig::default()
    }
}

#[tokio::test]
async fn test_posts_content_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "content": "Steve ran \"/op\"\nnext line" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(&config_for(&server)).unwrap();
    notifier
        .notify("Steve ran \"/op\"\nnext line")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(&config_for(&server)).unwrap();
    let err = notifier.notify("hello").await.unwrap_err();
    assert!(matches!(err, WatchdogError::WebhookRejected { status: 429 }));
}

#[tokio::test]
async fn test_missing_url() {
    let notifier = WebhookNotifier::new(&DiscordConfig::default()).unwrap();
    let err = notifier.notify("hello").await.unwrap_err();
    assert!(matches!(err, WatchdogError::WebhookNotConfigured));
}

#[tokio::test]
async fn test_reconfigure_changes_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(&DiscordConfig::default()).unwrap();
    notifier.reconfigure(&config_for(&server));
    notifier.notify("after reload").await.unwrap();
}

#[tokio::test]
async fn test_unreachable_host() {
    let config = DiscordConfig {
        webhook_url: "http://127.0.0.1:1/webhook".to_string(),
        timeout_secs: 2,
        ..DiscordConfig::default()
    };

    let notifier = WebhookNotifier::new(&config).unwrap();
    let err = notifier.notify("hello").await.unwrap_err();
    assert!(matches!(err, WatchdogError::Http(_)));
}

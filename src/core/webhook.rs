//! Webhook delivery for chat-channel notifications.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::DiscordConfig;
use crate::core::error::{Result, WatchdogError};

/// Destination for rendered notification text.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, content: &str) -> Result<()>;

    /// Apply a reloaded configuration.
    fn reconfigure(&self, _config: &DiscordConfig) {}
}

/// Posts `{"content": ...}` to a Discord-compatible webhook.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: RwLock<String>,
}

impl WebhookNotifier {
    pub fn new(config: &DiscordConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            webhook_url: RwLock::new(config.webhook_url.clone()),
        })
    }

    fn webhook_url(&self) -> String {
        self.webhook_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, content: &str) -> Result<()> {
        let url = self.webhook_url();
        if url.trim().is_empty() {
            return Err(WatchdogError::WebhookNotConfigured);
        }

        let body = json!({ "content": content });
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Webhook message delivered");
            Ok(())
        } else {
            Err(WatchdogError::WebhookRejected {
                status: status.as_u16(),
            })
        }
    }

    fn reconfigure(&self, config: &DiscordConfig) {
        *self.webhook_url.write().unwrap_or_else(PoisonError::into_inner) =
            config.webhook_url.clone();
    }
}

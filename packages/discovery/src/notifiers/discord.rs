//! Discord webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::traits::notifier::Notifier;

const DEFAULT_USERNAME: &str = "Discovery Worker";
const EMBED_TITLE: &str = "businesses";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each message as a single embed to a Discord webhook.
#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl DiscordNotifier {
    /// Create a notifier whose requests give up after 10 seconds.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(webhook_url, client))
    }

    /// Use a preconfigured client. Its timeout bounds every `notify` call.
    pub fn with_client(webhook_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            username: DEFAULT_USERNAME.to_string(),
        }
    }

    /// Override the display name shown on posted messages.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    fn payload<'a>(&'a self, message: &'a str) -> WebhookPayload<'a> {
        WebhookPayload {
            username: &self.username,
            embeds: [Embed {
                title: EMBED_TITLE,
                description: message,
            }],
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    username: &'a str,
    embeds: [Embed<'a>; 1],
}

#[derive(Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'a str,
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(|e| DiscoveryError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Notification(format!(
                "Discord webhook returned {}: {}",
                status, body
            )));
        }

        debug!(message = %message, "Posted Discord notification");
        Ok(())
    }
}

// # Discord Webhook Notifier
//
// Delivers transition alerts to a Discord channel webhook.
//
// ## Behavior
//
// - One POST per notification, JSON `{content, username}`
// - HTTP timeout bounds every delivery
// - Non-2xx responses are returned as errors; the poll loop logs them
// - No retries, no queueing: a lost alert never blocks monitoring
//
// ## Security
//
// The webhook URL embeds its secret token and NEVER appears in logs.

use async_trait::async_trait;
use hotspot_core::traits::{Notification, Notifier};
use hotspot_core::{Error, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Display name the webhook posts under
pub const DEFAULT_USERNAME: &str = "Pi Hotspot";

/// Default HTTP timeout for webhook delivery
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook request body
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookPayload {
    pub content: String,
    pub username: String,
}

impl WebhookPayload {
    pub fn new(notification: &Notification, username: &str) -> Self {
        Self {
            content: notification.content(),
            username: username.to_string(),
        }
    }
}

/// Discord webhook notifier
pub struct DiscordNotifier {
    /// Webhook URL
    /// ⚠️ NEVER log this value
    webhook_url: String,

    username: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the webhook token
impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("webhook_url", &"<REDACTED>")
            .field("username", &self.username)
            .finish()
    }
}

impl DiscordNotifier {
    /// Create a notifier for `webhook_url`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is empty or the HTTP client
    /// cannot be built.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(webhook_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return Err(Error::config("Webhook URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            webhook_url,
            username: DEFAULT_USERNAME.to_string(),
            client,
        })
    }

    /// Post under a different display name
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload::new(notification, &self.username);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            // without_url keeps the token out of the error text
            .map_err(|e| Error::notification(format!("Webhook request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::notification(format!("Webhook returned {}", status)));
        }

        debug!("Delivered {} to Discord", notification.event);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "discord"
    }
}

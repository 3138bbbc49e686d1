//! Discord webhook notifier.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::NotificationConfig;
use crate::domain::notification::{Embed, WebhookMessage};
use crate::ports::{NotificationChannel, NotificationError, Notifier};

/// Posts embeds to Discord channel webhooks.
///
/// Donations go to the dedicated donation webhook when one is configured and
/// to the general webhook otherwise.
pub struct DiscordWebhookNotifier {
    general: Option<SecretString>,
    donation: Option<SecretString>,
    http_client: reqwest::Client,
}

impl DiscordWebhookNotifier {
    pub fn from_config(config: &NotificationConfig) -> Self {
        let secret = |url: &Option<String>| {
            url.clone()
                .filter(|u| !u.trim().is_empty())
                .map(SecretString::new)
        };
        Self {
            general: secret(&config.webhook_url),
            donation: secret(&config.donation_webhook_url),
            http_client: reqwest::Client::new(),
        }
    }

    fn webhook_for(&self, channel: NotificationChannel) -> Option<&SecretString> {
        match channel {
            NotificationChannel::General => self.general.as_ref(),
            NotificationChannel::Donation => self.donation.as_ref().or(self.general.as_ref()),
        }
    }
}

#[async_trait]
impl Notifier for DiscordWebhookNotifier {
    async fn send(&self, channel: NotificationChannel, embed: &Embed) -> Result<(), NotificationError> {
        let url = self
            .webhook_for(channel)
            .ok_or(NotificationError::NotConfigured(channel))?;

        let response = self
            .http_client
            .post(url.expose_secret())
            .json(&WebhookMessage::single(embed))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotificationError::Status(response.status().as_u16()));
        }

        tracing::debug!(title = %embed.title, ?channel, "Notification delivered");
        Ok(())
    }
}

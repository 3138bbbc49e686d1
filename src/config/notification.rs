//! Notification channel configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Discord webhook URLs for operator notifications
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationConfig {
    /// General channel for subscription lifecycle notifications
    pub webhook_url: Option<String>,

    /// Dedicated donation channel; donations go to the general channel when unset
    pub donation_webhook_url: Option<String>,
}

impl NotificationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("notifications.webhook_url", &self.webhook_url),
            (
                "notifications.donation_webhook_url",
                &self.donation_webhook_url,
            ),
        ] {
            if let Some(value) = value {
                if url::Url::parse(value).is_err() {
                    return Err(ValidationError::InvalidUrl(name));
                }
            }
        }
        Ok(())
    }
}

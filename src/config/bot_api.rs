//! External bot-management API configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Bot-management API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotApiConfig {
    /// Base URL of the bot-management API
    pub base_url: Option<String>,

    /// Value sent in the `X-API-Key` header
    pub api_key: Option<String>,

    /// Per-request timeout in seconds for server lookups
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BotApiConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 30 {
            return Err(ValidationError::InvalidBotApiTimeout);
        }
        if let Some(base) = self.base_url.as_deref() {
            if url::Url::parse(base).is_err() {
                return Err(ValidationError::InvalidUrl("bot_api.base_url"));
            }
        }
        Ok(())
    }
}

impl Default for BotApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_three_seconds() {
        assert_eq!(BotApiConfig::default().timeout_secs, 3);
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = BotApiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_base_url_fails_validation() {
        let config = BotApiConfig {
            base_url: Some("bots/api".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

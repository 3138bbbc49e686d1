//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
///
/// Both secrets are optional at load time. Checkout endpoints answer with a
/// configuration error while the secret key is unset, and the webhook
/// endpoint does the same while the signing secret is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: Option<String>,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<String>,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Reject test-mode events
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key
            .as_deref()
            .is_some_and(|k| k.starts_with("sk_test_"))
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key
            .as_deref()
            .is_some_and(|k| k.starts_with("sk_live_") || k.starts_with("rk_live_"))
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Verify key prefixes for safety
        if let Some(key) = self.stripe_secret_key.as_deref() {
            if !(key.starts_with("sk_") || key.starts_with("rk_")) {
                return Err(ValidationError::InvalidStripeKey);
            }
        }
        if let Some(secret) = self.stripe_webhook_secret.as_deref() {
            if !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("payment.api_base_url"));
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            api_base_url: default_api_base_url(),
            require_livemode: false,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_mode() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_test_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_live_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_unconfigured_is_valid() {
        assert!(PaymentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        let config = PaymentConfig {
            stripe_secret_key: Some("pk_test_xxx".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStripeKey)
        ));
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_test_xxx".to_string()),
            stripe_webhook_secret: Some("secret_xxx".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PaymentConfig {
            stripe_secret_key: Some("sk_test_abcd1234".to_string()),
            stripe_webhook_secret: Some("whsec_xyz789".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}

//! Webhook error types for Stripe webhook handling.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signing secret is configured.
    #[error("Webhook secret not configured")]
    NotConfigured,

    /// Request carried no Stripe-Signature header.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse the signature header or the JSON payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Test-mode event received while live mode is required.
    #[error("Test mode events not allowed")]
    LivemodeRequired,

    /// Signed event whose object does not have the expected shape.
    #[error("Malformed {object} object: {reason}")]
    MalformedObject {
        object: &'static str,
        reason: String,
    },
}

impl WebhookError {
    /// True for every failure that happens before the event is trusted.
    ///
    /// These produce zero side effects and a 400 response.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
                | WebhookError::ParseError(_)
                | WebhookError::LivemodeRequired
        )
    }

    /// Maps the error to an HTTP status code.
    ///
    /// 4xx stops Stripe retrying; 5xx makes it retry.
    pub fn status_code(&self) -> StatusCode {
        if self.is_verification_failure() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Error Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn invalid_signature_displays_correctly() {
        assert_eq!(WebhookError::InvalidSignature.to_string(), "Invalid signature");
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");
    }

    #[test]
    fn malformed_object_names_the_object() {
        let err = WebhookError::MalformedObject {
            object: "invoice",
            reason: "missing field `id`".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed invoice object: missing field `id`");
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_failures_return_bad_request() {
        for err in [
            WebhookError::MissingSignature,
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::ParseError("x".to_string()),
            WebhookError::LivemodeRequired,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }

    #[test]
    fn not_configured_returns_internal_error() {
        assert_eq!(
            WebhookError::NotConfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_object_returns_internal_error() {
        let err = WebhookError::MalformedObject {
            object: "subscription",
            reason: "bad".to_string(),
        };
        assert!(!err.is_verification_failure());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Stripe webhook signature verification.
//!
//! Verifies Stripe webhook signatures using HMAC-SHA256 over the raw body,
//! with timestamp validation to limit replays.

use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for webhook events (5 minutes).
pub const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Every v1 signature present. Stripe sends several while a secret is rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::ParseError("missing v1 signature".to_string()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: SecretString,
    /// Reject test-mode events.
    require_livemode: bool,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            require_livemode: false,
        }
    }

    /// Require livemode events.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// `payload` must be the raw request body exactly as received.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - no v1 signature matches
    /// - `TimestampOutOfRange` - event is older than 5 minutes
    /// - `InvalidTimestamp` - event timestamp is in the future
    /// - `ParseError` - failed to parse header or JSON payload
    /// - `LivemodeRequired` - test-mode event while live mode is required
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        self.verify_and_parse_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    fn verify_and_parse_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        validate_timestamp(header.timestamp, now)?;

        let expected = compute_signature(self.secret.expose_secret(), header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        let event: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        if self.require_livemode && !event.livemode {
            tracing::warn!(event_id = %event.id, "Rejected test mode event");
            return Err(WebhookError::LivemodeRequired);
        }

        Ok(event)
    }
}

/// Validates that the timestamp is within acceptable bounds.
fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), WebhookError> {
    let age = now - timestamp;

    if age > MAX_EVENT_AGE_SECS {
        return Err(WebhookError::TimestampOutOfRange);
    }

    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(WebhookError::InvalidTimestamp);
    }

    Ok(())
}

/// HMAC-SHA256 over `"{timestamp}.{payload}"`, on raw bytes.
fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a `Stripe-Signature` header value for `payload`.
///
/// Used to sign fixtures and to replay captured events locally.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let signature = compute_signature(secret, timestamp, payload)
        .map(hex::encode)
        .unwrap_or_default();
    format!("t={},v1={}", timestamp, signature)
}

/// Decodes a body the transport delivered base64-encoded.
pub fn decode_base64_body(body: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let trimmed: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|e| WebhookError::ParseError(format!("invalid base64 body: {}", e)))
}

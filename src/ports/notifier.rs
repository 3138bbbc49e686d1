//! Operator notification port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::Embed;

/// Destination channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChannel {
    /// Subscription lifecycle events.
    General,
    /// Donations. Falls back to `General` when not configured separately.
    Donation,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel: NotificationChannel, embed: &Embed) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("No webhook configured for {0:?} notifications")]
    NotConfigured(NotificationChannel),

    #[error("Notification webhook returned {0}")]
    Status(u16),

    #[error("Notification delivery failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn Notifier) {}
    }
}

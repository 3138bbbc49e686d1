//! Notifier that records embeds instead of posting them.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::notification::Embed;
use crate::ports::{NotificationChannel, NotificationError, Notifier};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<RecordingState>>,
}

#[derive(Default)]
struct RecordingState {
    sent: Vec<(NotificationChannel, Embed)>,
    error: Option<NotificationError>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail every delivery with `error`. Failed deliveries are still recorded.
    pub fn fail_with(&self, error: NotificationError) {
        self.state().error = Some(error);
    }

    pub fn sent(&self) -> Vec<(NotificationChannel, Embed)> {
        self.state().sent.clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.state()
            .sent
            .iter()
            .map(|(_, embed)| embed.title.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel: NotificationChannel, embed: &Embed) -> Result<(), NotificationError> {
        let mut state = self.state();
        state.sent.push((channel, embed.clone()));
        match state.error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

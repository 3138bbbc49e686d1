//! In-memory `BotApi` for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{BotApi, BotApiError, SubscriptionUpdate};

/// Mock bot-management API.
///
/// `installed` drives both lookup endpoints. Individual guilds can be made to
/// fail `check-server` with a status so the server-list fallback is used.
#[derive(Clone)]
pub struct MockBotApi {
    inner: Arc<Mutex<MockBotState>>,
}

struct MockBotState {
    configured: bool,
    accepts_updates: bool,
    installed: HashSet<(String, String)>,
    check_errors: HashMap<String, BotApiError>,
    list_error: Option<BotApiError>,
    update_error: Option<BotApiError>,
    check_delay: Option<Duration>,
    update_delay: Option<Duration>,
    updates: Vec<SubscriptionUpdate>,
    check_calls: usize,
    list_calls: usize,
}

impl Default for MockBotApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBotApi {
    /// A configured API that accepts updates.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockBotState {
                configured: true,
                accepts_updates: true,
                installed: HashSet::new(),
                check_errors: HashMap::new(),
                list_error: None,
                update_error: None,
                check_delay: None,
                update_delay: None,
                updates: Vec::new(),
                check_calls: 0,
                list_calls: 0,
            })),
        }
    }

    /// An API with no base URL.
    pub fn unconfigured() -> Self {
        let api = Self::new();
        {
            let mut state = api.state();
            state.configured = false;
            state.accepts_updates = false;
        }
        api
    }

    fn state(&self) -> MutexGuard<'_, MockBotState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Configured for lookups but pointing at a local host.
    pub fn rejecting_updates(self) -> Self {
        self.state().accepts_updates = false;
        self
    }

    pub fn with_installed(self, guild_id: &str, bot_name: &str) -> Self {
        self.state()
            .installed
            .insert((guild_id.to_string(), bot_name.to_string()));
        self
    }

    pub fn fail_check_for(&self, guild_id: &str, error: BotApiError) {
        self.state().check_errors.insert(guild_id.to_string(), error);
    }

    /// Delay every `check-server` answer.
    pub fn delay_checks(&self, delay: Duration) {
        self.state().check_delay = Some(delay);
    }

    /// Delay every subscription update; the update is recorded once the delay ends.
    pub fn delay_updates(&self, delay: Duration) {
        self.state().update_delay = Some(delay);
    }

    pub fn fail_list(&self, error: BotApiError) {
        self.state().list_error = Some(error);
    }

    pub fn fail_updates(&self, error: BotApiError) {
        self.state().update_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn updates(&self) -> Vec<SubscriptionUpdate> {
        self.state().updates.clone()
    }

    pub fn check_calls(&self) -> usize {
        self.state().check_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    fn is_configured(&self) -> bool {
        self.state().configured
    }

    fn accepts_updates(&self) -> bool {
        self.state().accepts_updates
    }

    async fn check_server(&self, guild_id: &str, bot_name: &str) -> Result<bool, BotApiError> {
        let delay = self.state().check_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state();
        state.check_calls += 1;
        if !state.configured {
            return Err(BotApiError::NotConfigured);
        }
        if let Some(err) = state.check_errors.get(guild_id) {
            return Err(err.clone());
        }
        Ok(state
            .installed
            .contains(&(guild_id.to_string(), bot_name.to_string())))
    }

    async fn list_servers(&self, bot_name: &str) -> Result<Vec<String>, BotApiError> {
        let mut state = self.state();
        state.list_calls += 1;
        if !state.configured {
            return Err(BotApiError::NotConfigured);
        }
        if let Some(err) = state.list_error.clone() {
            return Err(err);
        }
        Ok(state
            .installed
            .iter()
            .filter(|(_, bot)| bot == bot_name)
            .map(|(guild, _)| guild.clone())
            .collect())
    }

    async fn update_subscription(&self, update: &SubscriptionUpdate) -> Result<(), BotApiError> {
        let delay = self.state().update_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state();
        state.updates.push(update.clone());
        match state.update_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

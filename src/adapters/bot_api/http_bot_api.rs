//! HTTP client for the bot-management API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::BotApiConfig;
use crate::ports::{BotApi, BotApiError, SubscriptionUpdate};

const API_KEY_HEADER: &str = "X-API-Key";

/// Hosts that never receive subscription updates.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "[::1]", "example.com"];

pub struct HttpBotApi {
    base_url: Option<url::Url>,
    api_key: Option<SecretString>,
    lookup_timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpBotApi {
    pub fn from_config(config: &BotApiConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .and_then(|u| match url::Url::parse(u.trim_end_matches('/')) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unparseable bot API base URL");
                    None
                }
            });

        Self {
            base_url,
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .map(SecretString::new),
            lookup_timeout: Duration::from_secs(config.timeout_secs),
            http_client: reqwest::Client::new(),
        }
    }

    fn base(&self) -> Result<&url::Url, BotApiError> {
        self.base_url.as_ref().ok_or(BotApiError::NotConfigured)
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, BotApiError> {
        let base = self.base()?;
        let mut url = base.clone();
        let joined = format!("{}/{}", base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        Ok(url)
    }

    async fn get_json(&self, url: url::Url) -> Result<Value, BotApiError> {
        let response = self
            .http_client
            .get(url)
            .timeout(self.lookup_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(BotApiError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| BotApiError::InvalidResponse(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> BotApiError {
    if e.is_timeout() {
        BotApiError::Timeout
    } else {
        BotApiError::Transport(e.to_string())
    }
}

fn is_local_or_placeholder(url: &url::Url) -> bool {
    match url.host_str() {
        Some(host) => {
            LOCAL_HOSTS.contains(&host) || host.ends_with(".example.com") || host.ends_with(".local")
        }
        None => true,
    }
}

/// `true` when any of the presence flags is literally `true`.
fn presence_flag(body: &Value) -> bool {
    ["exists", "in_server", "present"]
        .iter()
        .any(|key| body.get(key) == Some(&Value::Bool(true)))
}

/// Guild IDs from a `servers` (or `guilds`) list of strings or objects.
fn server_ids(body: &Value) -> Vec<String> {
    let entries = body
        .get("servers")
        .or_else(|| body.get("guilds"))
        .and_then(Value::as_array);

    let Some(entries) = entries else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id.clone()),
            Value::Object(obj) => obj
                .get("id")
                .or_else(|| obj.get("guild_id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl BotApi for HttpBotApi {
    fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn accepts_updates(&self) -> bool {
        self.base_url
            .as_ref()
            .map(|url| !is_local_or_placeholder(url))
            .unwrap_or(false)
    }

    async fn check_server(&self, guild_id: &str, bot_name: &str) -> Result<bool, BotApiError> {
        let mut url = self.endpoint("check-server")?;
        url.query_pairs_mut()
            .append_pair("guild_id", guild_id)
            .append_pair("bot_name", bot_name);

        let body = self.get_json(url).await?;
        Ok(presence_flag(&body))
    }

    async fn list_servers(&self, bot_name: &str) -> Result<Vec<String>, BotApiError> {
        let mut url = self.endpoint("servers")?;
        url.query_pairs_mut().append_pair("bot_name", bot_name);

        let body = self.get_json(url).await?;
        Ok(server_ids(&body))
    }

    async fn update_subscription(&self, update: &SubscriptionUpdate) -> Result<(), BotApiError> {
        let url = self.base()?.clone();

        let mut request = self.http_client.post(url).json(update);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BotApiError::Status(status.as_u16()));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::info!(
            server_id = %update.server_id,
            action = update.action.as_str(),
            response = %body,
            "Bot API accepted subscription update"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api(base: Option<&str>) -> HttpBotApi {
        HttpBotApi::from_config(&BotApiConfig {
            base_url: base.map(str::to_string),
            ..Default::default()
        })
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Update gating
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn remote_host_accepts_updates() {
        let api = api(Some("https://bots.duckdns.org/api"));
        assert!(api.is_configured());
        assert!(api.accepts_updates());
    }

    #[test]
    fn local_hosts_are_configured_but_skip_updates() {
        for base in [
            "http://localhost:5000/api",
            "http://127.0.0.1:5000/api",
            "http://0.0.0.0/api",
            "https://your-bot.example.com/api",
        ] {
            let api = api(Some(base));
            assert!(api.is_configured(), "{base}");
            assert!(!api.accepts_updates(), "{base}");
        }
    }

    #[test]
    fn missing_base_url_is_unconfigured() {
        let api = api(None);
        assert!(!api.is_configured());
        assert!(!api.accepts_updates());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // URL building
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn endpoints_extend_base_path() {
        let api = api(Some("https://bots.duckdns.org/api/"));
        assert_eq!(
            api.endpoint("check-server").unwrap().as_str(),
            "https://bots.duckdns.org/api/check-server"
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response parsing
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn any_presence_flag_counts() {
        assert!(presence_flag(&json!({"exists": true})));
        assert!(presence_flag(&json!({"in_server": true})));
        assert!(presence_flag(&json!({"present": true, "exists": false})));
        assert!(!presence_flag(&json!({"exists": "true"})));
        assert!(!presence_flag(&json!({})));
    }

    #[test]
    fn server_list_accepts_strings_and_objects() {
        let body = json!({"servers": ["111", {"id": "222"}, {"guild_id": "333"}, 444]});
        assert_eq!(server_ids(&body), vec!["111", "222", "333"]);

        let body = json!({"guilds": [{"guild_id": "555"}]});
        assert_eq!(server_ids(&body), vec!["555"]);

        assert!(server_ids(&json!({"unexpected": []})).is_empty());
    }

    #[tokio::test]
    async fn unconfigured_lookup_fails_fast() {
        let result = api(None).check_server("223344556677889900", "gavel").await;
        assert_eq!(result.unwrap_err(), BotApiError::NotConfigured);
    }
}

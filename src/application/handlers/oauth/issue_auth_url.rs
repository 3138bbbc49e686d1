//! IssueAuthUrlHandler - Builds the Discord authorization URL for the server picker.

use std::sync::Arc;

use crate::domain::foundation::non_blank;

use super::{OAuthError, OAuthSettings, OAuthState, OAUTH_SCOPES};

#[derive(Debug, Clone, Default)]
pub struct IssueAuthUrlCommand {
    pub bot_name: Option<String>,
    pub origin: Option<String>,
}

pub struct IssueAuthUrlHandler {
    settings: Arc<OAuthSettings>,
}

impl IssueAuthUrlHandler {
    pub fn new(settings: Arc<OAuthSettings>) -> Self {
        Self { settings }
    }

    pub fn handle(&self, cmd: IssueAuthUrlCommand) -> Result<String, OAuthError> {
        let client_id = self.settings.client_id()?;

        let redirect_uri = self.settings.redirect_uri(cmd.origin.as_deref());
        url::Url::parse(&redirect_uri).map_err(|_| OAuthError::InvalidRedirectUri)?;

        let mut auth_url =
            url::Url::parse(&self.settings.authorize_url).map_err(|_| OAuthError::NotConfigured)?;
        {
            let mut query = auth_url.query_pairs_mut();
            query
                .append_pair("client_id", client_id)
                .append_pair("redirect_uri", &redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", OAUTH_SCOPES);

            if let Some(bot_name) = non_blank(cmd.bot_name.as_deref()) {
                let state = OAuthState {
                    bot_name: Some(bot_name.to_string()),
                };
                let state =
                    serde_json::to_string(&state).map_err(|_| OAuthError::NotConfigured)?;
                query.append_pair("state", &state);
            }
        }

        Ok(auth_url.into())
    }
}

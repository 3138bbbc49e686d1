//! HTTP handlers for storefront endpoints.
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;

use crate::application::handlers::checkout::{
    CreateDonationSessionCommand, CreateDonationSessionHandler, CreateSessionError,
    CreateSubscriptionSessionCommand, CreateSubscriptionSessionHandler,
};
use crate::application::handlers::oauth::{
    ExchangeCodeCommand, ExchangeCodeHandler, GuildMembershipResolver, IssueAuthUrlCommand,
    IssueAuthUrlHandler, OAuthError, OAuthSettings,
};
use crate::application::handlers::webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler,
};
use crate::config::AppConfig;
use crate::domain::billing::{decode_base64_body, StripeWebhookVerifier, WebhookError};
use crate::domain::catalog::Catalog;
use crate::domain::foundation::non_blank;
use crate::ports::{BotApi, DiscordApi, Notifier, PaymentProvider};

use super::dto::{
    AuthUrlResponse, CreateCheckoutSessionRequest, CreateDonationSessionRequest,
    DiscordOAuthQuery, ErrorResponse, GuildsResponse, ProductsResponse, SessionResponse,
    WebhookReceivedResponse,
};

/// Header set by proxies that deliver the webhook body base64-encoded.
pub const BODY_ENCODING_HEADER: &str = "x-body-encoding";
const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// External systems the storefront talks to.
#[derive(Clone)]
pub struct StorefrontPorts {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub discord: Arc<dyn DiscordApi>,
    pub bot_api: Arc<dyn BotApi>,
    pub notifier: Arc<dyn Notifier>,
}

/// Shared application state. Cloned per request; every handler is behind an `Arc`.
#[derive(Clone)]
pub struct StorefrontAppState {
    pub subscription_checkout: Arc<CreateSubscriptionSessionHandler>,
    pub donation_checkout: Arc<CreateDonationSessionHandler>,
    pub issue_auth_url: Arc<IssueAuthUrlHandler>,
    pub exchange_code: Arc<ExchangeCodeHandler>,
    pub stripe_webhook: Arc<HandleStripeWebhookHandler>,
    pub catalog: Arc<Catalog>,
    pub public_url: String,
}

/// Lookups and side effects run in two sequential stages, each well inside
/// the request timeout.
fn downstream_timeout(request_timeout_secs: u64) -> Duration {
    Duration::from_secs(request_timeout_secs) / 3
}

impl StorefrontAppState {
    /// Wires every handler from configuration and the given ports.
    pub fn new(config: &AppConfig, ports: StorefrontPorts) -> Self {
        let catalog = Arc::new(Catalog::standard());
        let source_tag = config.server.source_tag.clone();
        let oauth_settings = Arc::new(OAuthSettings::from_config(&config.discord, &config.server));

        let verifier = config
            .payment
            .stripe_webhook_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| {
                Arc::new(
                    StripeWebhookVerifier::new(secret)
                        .with_require_livemode(config.payment.require_livemode),
                )
            });

        let bot_token = config
            .discord
            .bot_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::new(token.to_string()));
        let resolver = GuildMembershipResolver::new(
            ports.discord.clone(),
            ports.bot_api.clone(),
            config.bots.application_ids(),
            bot_token,
        )
        .with_check_timeout(Duration::from_secs(config.bot_api.timeout_secs));

        Self {
            subscription_checkout: Arc::new(CreateSubscriptionSessionHandler::new(
                ports.payment_provider.clone(),
                catalog.clone(),
                source_tag.clone(),
            )),
            donation_checkout: Arc::new(CreateDonationSessionHandler::new(
                ports.payment_provider.clone(),
                source_tag.clone(),
            )),
            issue_auth_url: Arc::new(IssueAuthUrlHandler::new(oauth_settings.clone())),
            exchange_code: Arc::new(ExchangeCodeHandler::new(
                ports.discord,
                Arc::new(resolver),
                catalog.clone(),
                oauth_settings,
            )),
            stripe_webhook: Arc::new(HandleStripeWebhookHandler::new(
                verifier,
                ports.payment_provider,
                ports.notifier,
                ports.bot_api,
                source_tag,
            )
            .with_downstream_timeout(downstream_timeout(config.server.request_timeout_secs))),
            catalog,
            public_url: config.server.public_url.clone(),
        }
    }

    /// Request origin, else the public site URL.
    fn origin_or_public(&self, headers: &HeaderMap) -> String {
        request_origin(headers).unwrap_or_else(|| self.public_url.clone())
    }
}

/// `Origin` header, when the browser sent a usable one.
fn request_origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "null")
        .map(str::to_string)
}

fn is_base64_body(headers: &HeaderMap) -> bool {
    headers
        .get(BODY_ENCODING_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<StorefrontAppState>,
    headers: HeaderMap,
    body: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let Json(request) = body?;
    let cmd = CreateSubscriptionSessionCommand {
        price_id: request.price_id,
        guild_id: request.guild_id,
        bot_name: request.bot_name,
        origin: state.origin_or_public(&headers),
    };

    let session = state
        .subscription_checkout
        .handle(cmd)
        .await
        .map_err(StorefrontApiError::checkout)?;

    Ok(Json(SessionResponse {
        session_id: session.id,
    }))
}

/// POST /api/create-donation-session
pub async fn create_donation_session(
    State(state): State<StorefrontAppState>,
    headers: HeaderMap,
    body: Result<Json<CreateDonationSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let Json(request) = body?;
    let cmd = CreateDonationSessionCommand {
        amount: request.amount.map(Into::into),
        name: request.name,
        message: request.message,
        origin: state.origin_or_public(&headers),
    };

    let session = state
        .donation_checkout
        .handle(cmd)
        .await
        .map_err(StorefrontApiError::donation)?;

    Ok(Json(SessionResponse {
        session_id: session.id,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Discord OAuth
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/discord-oauth
///
/// Without `code`: returns the authorization URL. With `code`: completes the
/// exchange and returns the partitioned guild lists.
pub async fn discord_oauth(
    State(state): State<StorefrontAppState>,
    headers: HeaderMap,
    Query(query): Query<DiscordOAuthQuery>,
) -> Result<Response, StorefrontApiError> {
    let origin = request_origin(&headers);

    let Some(code) = non_blank(query.code.as_deref()) else {
        let auth_url = state
            .issue_auth_url
            .handle(IssueAuthUrlCommand {
                bot_name: query.bot_name,
                origin,
            })
            .map_err(StorefrontApiError::AuthUrl)?;
        return Ok(Json(AuthUrlResponse { auth_url }).into_response());
    };

    let cmd = ExchangeCodeCommand {
        code: code.to_string(),
        state: query.state,
        bot_name: query.bot_name,
        origin,
    };
    let partition = state
        .exchange_code
        .handle(cmd)
        .await
        .map_err(StorefrontApiError::OAuthCallback)?;

    Ok(Json(GuildsResponse::from(partition)).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe webhook
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/stripe-webhook
pub async fn stripe_webhook(
    State(state): State<StorefrontAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let payload = if is_base64_body(&headers) {
        decode_base64_body(&body)?
    } else {
        body.to_vec()
    };

    let outcome = state
        .stripe_webhook
        .handle(HandleStripeWebhookCommand { payload, signature })
        .await?;

    tracing::debug!(
        kind = outcome.kind,
        notification = ?outcome.notification,
        bot_update = ?outcome.bot_update,
        "Webhook processed"
    );

    Ok(Json(WebhookReceivedResponse { received: true }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/products
pub async fn list_products(State(state): State<StorefrontAppState>) -> impl IntoResponse {
    Json(ProductsResponse {
        products: state.catalog.products().to_vec(),
    })
}

/// Fallback for a known path called with the wrong method.
pub async fn method_not_allowed() -> StorefrontApiError {
    StorefrontApiError::MethodNotAllowed
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum StorefrontApiError {
    /// Body was not valid JSON for the endpoint.
    InvalidBody(String),
    Checkout {
        failure: &'static str,
        error: CreateSessionError,
    },
    AuthUrl(OAuthError),
    OAuthCallback(OAuthError),
    Webhook(WebhookError),
    MethodNotAllowed,
}

impl StorefrontApiError {
    fn checkout(error: CreateSessionError) -> Self {
        Self::Checkout {
            failure: "Failed to create checkout session",
            error,
        }
    }

    fn donation(error: CreateSessionError) -> Self {
        Self::Checkout {
            failure: "Failed to create donation session",
            error,
        }
    }
}

impl From<JsonRejection> for StorefrontApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<WebhookError> for StorefrontApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl IntoResponse for StorefrontApiError {
    fn into_response(self) -> Response {
        match self {
            StorefrontApiError::InvalidBody(reason) => {
                tracing::debug!(reason = %reason, "Rejected request body");
                let body = ErrorResponse::new("Invalid request body").with_details(reason);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            StorefrontApiError::Checkout {
                error: CreateSessionError::Invalid(e),
                ..
            } => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response(),
            StorefrontApiError::Checkout {
                failure,
                error: CreateSessionError::Provider(e),
            } => {
                tracing::error!(error = %e, code = ?e.code, "{}", failure);
                let body = ErrorResponse::new(failure).with_details(e.message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            StorefrontApiError::AuthUrl(OAuthError::NotConfigured) => {
                let body = serde_json::json!({
                    "error": OAuthError::NotConfigured.to_string(),
                    "authUrl": null,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            StorefrontApiError::AuthUrl(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.to_string())))
                    .into_response()
            }
            StorefrontApiError::OAuthCallback(e) => {
                let body = ErrorResponse::new(e.to_string()).unsuccessful();
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            StorefrontApiError::Webhook(e) if e.is_verification_failure() => {
                tracing::warn!(error = %e, "Webhook verification failed");
                (e.status_code(), Json(ErrorResponse::new(e.to_string()))).into_response()
            }
            StorefrontApiError::Webhook(e) => {
                tracing::error!(error = %e, "Webhook processing failed");
                let body = ErrorResponse::new("Webhook processing failed").with_detail(e.to_string());
                (e.status_code(), Json(body)).into_response()
            }
            StorefrontApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorResponse::new("Method not allowed")),
            )
                .into_response(),
        }
    }
}

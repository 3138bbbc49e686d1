//! Axum router configuration for storefront endpoints.

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::handlers::{
    create_checkout_session, create_donation_session, discord_oauth, list_products,
    method_not_allowed, stripe_webhook, StorefrontAppState,
};

/// Create the storefront API router, suitable for nesting at `/api`.
///
/// # Routes
/// - `POST /create-checkout-session` - Bot subscription checkout
/// - `POST /create-donation-session` - One-time donation checkout
/// - `GET /discord-oauth` - Authorization URL, or the guild picker after the callback
/// - `POST /stripe-webhook` - Stripe webhooks (signature verified, no auth)
/// - `GET /products` - Product catalog
///
/// Any other method on these paths answers 405.
pub fn storefront_routes() -> Router<StorefrontAppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(create_checkout_session).fallback(method_not_allowed),
        )
        .route(
            "/create-donation-session",
            post(create_donation_session).fallback(method_not_allowed),
        )
        .route(
            "/discord-oauth",
            get(discord_oauth).fallback(method_not_allowed),
        )
        .route(
            "/stripe-webhook",
            post(stripe_webhook).fallback(method_not_allowed),
        )
        .route("/products", get(list_products).fallback(method_not_allowed))
}

/// Create the complete storefront router mounted at `/api`.
pub fn storefront_router() -> Router<StorefrontAppState> {
    Router::new().nest("/api", storefront_routes())
}

/// Storefront router with CORS, request timeout and tracing layers applied.
pub fn storefront_app(state: StorefrontAppState, server: &ServerConfig) -> Router {
    storefront_router()
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `*` unless explicit origins are configured. Answers OPTIONS preflights.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("stripe-signature"),
        ])
}

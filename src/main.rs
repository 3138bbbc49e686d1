//! Storefront server entry point.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bot_storefront::adapters::bot_api::HttpBotApi;
use bot_storefront::adapters::discord::{DiscordClient, DiscordWebhookNotifier};
use bot_storefront::adapters::http::{storefront_app, StorefrontAppState, StorefrontPorts};
use bot_storefront::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use bot_storefront::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let stripe = StripeConfig::from_config(&config.payment);
    if !stripe.is_configured() {
        tracing::warn!("Stripe secret key not set; checkout endpoints will fail");
    }
    if config.payment.stripe_webhook_secret.is_none() {
        tracing::warn!("Stripe webhook secret not set; webhooks will be rejected");
    }

    let ports = StorefrontPorts {
        payment_provider: Arc::new(StripePaymentAdapter::new(stripe)),
        discord: Arc::new(DiscordClient::from_config(&config.discord)),
        bot_api: Arc::new(HttpBotApi::from_config(&config.bot_api)),
        notifier: Arc::new(DiscordWebhookNotifier::from_config(&config.notifications)),
    };
    let state = StorefrontAppState::new(&config, ports);
    let app = storefront_app(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level. JSON lines in production.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}

//! HTTP adapter for the storefront.
//!
//! Exposes checkout, Discord OAuth and Stripe webhook handling via REST:
//! - `POST /api/create-checkout-session` - Start a bot subscription checkout
//! - `POST /api/create-donation-session` - Start a donation checkout
//! - `GET /api/discord-oauth` - OAuth URL or partitioned guild list
//! - `POST /api/stripe-webhook` - Handle Stripe webhooks
//! - `GET /api/products` - Product catalog

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{StorefrontApiError, StorefrontAppState, StorefrontPorts};
pub use routes::{storefront_app, storefront_router, storefront_routes};

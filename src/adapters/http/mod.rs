//! HTTP adapters - REST API implementations.

pub mod storefront;

pub use storefront::{storefront_app, storefront_router, StorefrontAppState, StorefrontPorts};

//! Bot Storefront - Checkout, Discord OAuth and Stripe lifecycle backend
//!
//! This crate sells Discord bot subscriptions: it creates hosted Stripe
//! checkout sessions, lets buyers pick a Discord server through OAuth, and
//! reacts to Stripe billing webhooks by notifying operators and the
//! bot-management API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

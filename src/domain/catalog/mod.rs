//! Product catalog.

#[allow(clippy::module_inception)]
mod catalog;
mod product;

pub use catalog::{Catalog, BUNDLE_ID};
pub use product::{BotKey, Feature, Product};

//! Domain layer: storefront value objects and rules, free of I/O.

pub mod billing;
pub mod catalog;
pub mod checkout;
pub mod foundation;
pub mod guild;
pub mod notification;

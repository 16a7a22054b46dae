//! Kusina
//!
//! Kusina is the storefront core of a small restaurant: a menu catalog, a price
//! resolver for customized products, a persisted cart and a checkout flow.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod summary;

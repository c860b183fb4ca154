//! Storefront
//!
//! Pricing and order-status derivations shared by every storefront surface.
//! Nothing in this crate performs I/O: the cart page and the checkout page feed
//! it the same inputs and get the same numbers back.

pub mod discounts;
pub mod items;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod status;

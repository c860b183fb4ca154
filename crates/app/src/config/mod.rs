//! Storefront configuration.

use rust_decimal::Decimal;
use thiserror::Error;

pub mod api;
pub mod observability;
pub mod pricing;

pub use api::ApiConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use pricing::PricingConfig;

/// Configuration that parsed but cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Pricing amounts or currency rejected by the pricing engine.
    #[error(transparent)]
    Pricing(#[from] storefront::prelude::PricingError),

    /// Tax rate outside `[0, 1]`.
    #[error("tax rate must be between 0 and 1, got {0}")]
    TaxRate(Decimal),
}

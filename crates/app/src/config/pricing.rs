//! Pricing Config

use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use storefront::prelude::PricingPolicy;

use super::ConfigError;

/// Shipping, tax and currency rules fed to the pricing engine.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// ISO 4217 currency code
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Subtotal from which shipping is free
    #[arg(long, env = "STOREFRONT_FREE_SHIPPING_THRESHOLD", default_value = "50")]
    pub free_shipping_threshold: Decimal,

    /// Shipping charged below the threshold
    #[arg(long, env = "STOREFRONT_FLAT_SHIPPING", default_value = "10")]
    pub flat_shipping: Decimal,

    /// Tax rate as a fraction, 0.10 for 10%
    #[arg(long, env = "STOREFRONT_TAX_RATE", default_value = "0.10")]
    pub tax_rate: Decimal,
}

impl PricingConfig {
    /// Build the pricing policy.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TaxRate`]: tax rate outside `[0, 1]`.
    /// - [`ConfigError::Pricing`]: unknown currency or a negative amount.
    pub fn policy(&self) -> Result<PricingPolicy, ConfigError> {
        if !(Decimal::ZERO..=Decimal::ONE).contains(&self.tax_rate) {
            return Err(ConfigError::TaxRate(self.tax_rate));
        }

        let currency = PricingPolicy::currency_from_code(self.currency.trim())?;

        Ok(PricingPolicy::new(
            currency,
            self.free_shipping_threshold,
            self.flat_shipping,
            Percentage::from(self.tax_rate),
        )?)
    }
}

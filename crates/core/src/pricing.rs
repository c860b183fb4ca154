//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Findable,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::items::PricedLine;

/// Errors raised while building a pricing policy.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A policy amount was below zero (field name, value).
    #[error("{0} cannot be negative, got {1}")]
    NegativeAmount(&'static str, Decimal),

    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Sum of `unit_price × quantity` over the given lines.
pub fn subtotal<L: PricedLine>(lines: &[L]) -> Decimal {
    lines.iter().map(PricedLine::line_total).sum()
}

/// Flat-rate shipping, tax and discount rules.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    currency: &'static Currency,
    free_shipping_threshold: Decimal,
    flat_shipping: Decimal,
    tax_rate: Percentage,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            currency: iso::USD,
            free_shipping_threshold: Decimal::from(50),
            flat_shipping: Decimal::from(10),
            tax_rate: Percentage::from(Decimal::new(10, 2)),
        }
    }
}

impl PricingPolicy {
    /// Create a pricing policy.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NegativeAmount`] if the threshold or the flat
    /// shipping charge is negative.
    pub fn new(
        currency: &'static Currency,
        free_shipping_threshold: Decimal,
        flat_shipping: Decimal,
        tax_rate: Percentage,
    ) -> Result<Self, PricingError> {
        if free_shipping_threshold.is_sign_negative() {
            return Err(PricingError::NegativeAmount(
                "free shipping threshold",
                free_shipping_threshold,
            ));
        }

        if flat_shipping.is_sign_negative() {
            return Err(PricingError::NegativeAmount("flat shipping", flat_shipping));
        }

        Ok(Self {
            currency,
            free_shipping_threshold,
            flat_shipping,
            tax_rate,
        })
    }

    /// Look up a currency by ISO code.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownCurrency`] if the code is not recognised.
    pub fn currency_from_code(code: &str) -> Result<&'static Currency, PricingError> {
        Currency::find(code).ok_or_else(|| PricingError::UnknownCurrency(code.to_string()))
    }

    /// Currency every amount is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Subtotal from which shipping is free.
    pub fn free_shipping_threshold(&self) -> Decimal {
        self.free_shipping_threshold
    }

    /// Shipping cost for a subtotal: free at or above the threshold, flat below it.
    pub fn shipping_cost(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    /// Tax charged on a subtotal.
    pub fn tax(&self, subtotal: Decimal) -> Decimal {
        self.tax_rate * subtotal
    }

    /// How much more has to be spent before shipping becomes free.
    pub fn amount_until_free_shipping(&self, subtotal: Decimal) -> Decimal {
        (self.free_shipping_threshold - subtotal).max(Decimal::ZERO)
    }

    /// Clamp a discount into `[0, subtotal]`.
    pub fn clamp_discount(subtotal: Decimal, discount: Decimal) -> Decimal {
        discount.max(Decimal::ZERO).min(subtotal.max(Decimal::ZERO))
    }

    /// Grand total: `subtotal + shipping + tax - discount`.
    pub fn grand_total(&self, subtotal: Decimal, discount: Decimal) -> Decimal {
        Summary::calculate(self, subtotal, discount).grand_total
    }
}

/// Every derived amount shown in an order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Sum of the line totals.
    pub subtotal: Decimal,

    /// Shipping charge.
    pub shipping: Decimal,

    /// Tax on the subtotal.
    pub tax: Decimal,

    /// Discount actually applied, after clamping.
    pub discount: Decimal,

    /// Amount due.
    pub grand_total: Decimal,
}

impl Summary {
    /// Price a subtotal and a requested discount under `policy`.
    pub fn calculate(policy: &PricingPolicy, subtotal: Decimal, discount: Decimal) -> Self {
        let shipping = policy.shipping_cost(subtotal);
        let tax = policy.tax(subtotal);
        let discount = PricingPolicy::clamp_discount(subtotal, discount);

        Self {
            subtotal,
            shipping,
            tax,
            discount,
            grand_total: subtotal + shipping + tax - discount,
        }
    }

    /// Price a set of lines under `policy`.
    pub fn for_lines<L: PricedLine>(
        policy: &PricingPolicy,
        lines: &[L],
        discount: Decimal,
    ) -> Self {
        Self::calculate(policy, subtotal(lines), discount)
    }

    /// Whether shipping is free for this summary.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

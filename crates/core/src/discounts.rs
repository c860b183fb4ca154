//! Discounts
//!
//! Coupons are validated by the server; this module only turns an accepted
//! coupon into the amount it takes off a subtotal.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors specific to coupon discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// The subtotal is below the coupon's minimum purchase.
    #[error("minimum purchase of {required} required, subtotal is {subtotal}")]
    MinimumPurchase {
        /// Minimum subtotal the coupon needs.
        required: Decimal,

        /// Subtotal the coupon was applied to.
        subtotal: Decimal,
    },

    /// The coupon carries a negative discount value.
    #[error("discount value cannot be negative, got {0}")]
    NegativeValue(Decimal),

    /// The discount calculation overflowed.
    #[error("discount calculation overflowed")]
    Overflow,
}

/// How a coupon reduces the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDiscount {
    /// Take this many percent off the subtotal (e.g. `15` for "15% off").
    Percentage(Decimal),

    /// Take a fixed amount off the subtotal.
    Fixed(Decimal),
}

/// A coupon accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coupon {
    /// Discount rule.
    pub discount: CouponDiscount,

    /// Minimum subtotal required for the coupon to apply.
    pub min_purchase: Decimal,
}

/// Calculate how much `coupon` takes off `subtotal`.
///
/// Percentage discounts are rounded to cents, half away from zero. The result
/// is not clamped; [`crate::pricing::Summary`] clamps it into `[0, subtotal]`.
///
/// # Errors
///
/// - [`DiscountError::MinimumPurchase`]: the subtotal is below the coupon minimum.
/// - [`DiscountError::NegativeValue`]: the coupon value is negative.
/// - [`DiscountError::Overflow`]: the percentage calculation overflowed.
pub fn calculate_discount(coupon: &Coupon, subtotal: Decimal) -> Result<Decimal, DiscountError> {
    if subtotal < coupon.min_purchase {
        return Err(DiscountError::MinimumPurchase {
            required: coupon.min_purchase,
            subtotal,
        });
    }

    match coupon.discount {
        CouponDiscount::Percentage(value) | CouponDiscount::Fixed(value)
            if value.is_sign_negative() =>
        {
            Err(DiscountError::NegativeValue(value))
        }
        CouponDiscount::Percentage(percent) => subtotal
            .checked_mul(percent)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .map(|amount| amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .ok_or(DiscountError::Overflow),
        CouponDiscount::Fixed(amount) => Ok(amount),
    }
}

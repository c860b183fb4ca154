//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{Coupon, CouponDiscount, DiscountError, calculate_discount},
    items::{Line, PricedLine},
    prices::{PriceError, to_money},
    pricing::{PricingError, PricingPolicy, Summary, subtotal},
    status::{Badge, OrderStatus, Stage, StatusTransitionError, Timeline},
};

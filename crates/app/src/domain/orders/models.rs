//! Order Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::prelude::{
    Coupon, CouponDiscount, DiscountError, OrderStatus, PricedLine, Timeline,
    calculate_discount, subtotal,
};

use crate::{api::pagination::Pagination, domain::catalog::models::ProductId, ids::TypedId};

pub type OrderId = TypedId<Order>;
pub type OrderItemId = TypedId<OrderItem>;

/// OrderItem Model
///
/// `price` is the unit price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_sku: Option<String>,
    pub quantity: u32,
    #[serde(alias = "unit_price")]
    pub price: Decimal,
}

impl PricedLine for OrderItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// ShippingAddress Model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Order Model
///
/// List payloads carry no `items`; only the detail payload can be checked
/// with [`Order::verify_totals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub item_count: Option<u32>,
    #[serde(alias = "total")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default, alias = "tax")]
    pub tax_amount: Decimal,
    #[serde(default, alias = "discount")]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, alias = "payment_intent_id")]
    pub payment_reference: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub delivered_at: Option<Timestamp>,
}

/// The monetary fields of an order do not add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub expected: Decimal,
    pub reported: Decimal,
}

impl Order {
    /// Sum of the snapshotted line prices.
    pub fn subtotal(&self) -> Decimal {
        subtotal(&self.items)
    }

    /// Check `total == subtotal + shipping + tax - discount`.
    ///
    /// # Errors
    ///
    /// Returns the expected and reported totals when they differ.
    pub fn verify_totals(&self) -> Result<(), TotalsMismatch> {
        let expected =
            self.subtotal() + self.shipping_cost + self.tax_amount - self.discount_amount;

        if expected == self.total_amount {
            Ok(())
        } else {
            Err(TotalsMismatch {
                expected,
                reported: self.total_amount,
            })
        }
    }

    pub fn timeline(&self) -> Timeline {
        Timeline::for_status(self.status)
    }

    /// Display reference: the order number when the server assigned one.
    pub fn reference(&self) -> String {
        self.order_number
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub shipping_address: ShippingAddress,
    pub payment_method_id: String,
    pub coupon_code: Option<String>,
}

impl OrderDraft {
    /// First required field left blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        let address = &self.shipping_address;

        [
            ("Address", address.address_line1.as_str()),
            ("City", address.city.as_str()),
            ("ZIP code", address.zip_code.as_str()),
            ("Country", address.country.as_str()),
            ("Payment method", self.payment_method_id.as_str()),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Coupon payload returned by the apply-coupon endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CouponPayload {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default)]
    pub min_purchase: Decimal,
    #[serde(default)]
    pub valid_from: Option<Timestamp>,
    #[serde(default)]
    pub valid_to: Option<Timestamp>,
}

impl CouponPayload {
    pub fn coupon(&self) -> Coupon {
        let discount = match self.discount_type {
            DiscountType::Percentage => CouponDiscount::Percentage(self.discount_value),
            DiscountType::Fixed => CouponDiscount::Fixed(self.discount_value),
        };

        Coupon {
            discount,
            min_purchase: self.min_purchase,
        }
    }
}

/// A coupon accepted for the current checkout.
///
/// `discount` is the amount at acceptance; the cart can change afterwards, so
/// summaries reprice through [`AppliedCoupon::discount_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    pub code: String,
    pub description: String,
    pub coupon: Coupon,
    pub discount: Decimal,
}

impl AppliedCoupon {
    /// Discount against the current `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::MinimumPurchase`] if `subtotal` is below the
    /// coupon's minimum.
    pub fn discount_for(&self, subtotal: Decimal) -> Result<Decimal, DiscountError> {
        calculate_discount(&self.coupon, subtotal)
    }
}

/// Order state mirrored from the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Orders {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
    pub order: Option<Order>,
    pub applied_coupon: Option<AppliedCoupon>,
}

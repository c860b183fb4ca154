//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::prelude::{PricedLine, PricingPolicy, Summary, subtotal};
use tracing::warn;

use crate::{
    domain::catalog::models::{Product, ProductId},
    ids::TypedId,
};

pub type CartItemId = TypedId<CartItem>;

/// CartItem Model
///
/// Priced at the live product price; the cart has no price snapshot of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Whether the quantity can go up without exceeding stock.
    pub fn can_increment(&self) -> bool {
        self.quantity < self.product.stock
    }

    /// Whether the quantity can go down without reaching zero.
    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> Decimal {
        self.product.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart payload as returned by the server's cart endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default, alias = "subtotal")]
    pub total: Option<Decimal>,
}

/// Cart Model
///
/// `total` is private and always recomputed from `items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    total: Decimal,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        let total = subtotal(&items);

        Self { items, total }
    }

    /// Build the cart from a server payload, logging any disagreement between
    /// the server's total and the one derived from the items.
    pub fn reconcile(payload: &CartPayload) -> Self {
        let cart = Self::new(payload.items.clone());

        if let Some(reported) = payload.total
            && reported != cart.total
        {
            warn!(
                %reported,
                derived = %cart.total,
                "server cart total differs from item total"
            );
        }

        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The cart without the given line, total recomputed.
    #[must_use]
    pub fn without(&self, id: CartItemId) -> Self {
        Self::new(
            self.items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect(),
        )
    }

    pub fn summary(&self, policy: &PricingPolicy, discount: Decimal) -> Summary {
        Summary::for_lines(policy, &self.items, discount)
    }
}

impl From<CartPayload> for Cart {
    fn from(payload: CartPayload) -> Self {
        Self::new(payload.items)
    }
}

// AddToCart Request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::test::helpers::{cart_item, product};

    use super::*;

    #[test]
    fn total_is_derived_from_items() {
        let cart = Cart::new(vec![
            cart_item(1, product(10, dec!(20), 5), 2),
            cart_item(2, product(11, dec!(15), 5), 1),
        ]);

        assert_eq!(cart.total(), dec!(55));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn reconcile_ignores_server_total() {
        let payload = CartPayload {
            items: vec![cart_item(1, product(10, dec!(12.50), 5), 2)],
            total: Some(dec!(999)),
        };

        assert_eq!(Cart::reconcile(&payload).total(), dec!(25.00));
    }

    #[test]
    fn without_recomputes_total() {
        let cart = Cart::new(vec![
            cart_item(1, product(10, dec!(20), 5), 2),
            cart_item(2, product(11, dec!(15), 5), 1),
        ]);

        let remaining = cart.without(CartItemId::new(1));

        assert_eq!(remaining.total(), dec!(15));
        assert_eq!(remaining.items().len(), 1);
        assert_eq!(cart.without(CartItemId::new(99)), cart);
    }

    #[test]
    fn quantity_affordances_follow_stock() {
        let at_stock = cart_item(1, product(10, dec!(5), 3), 3);
        let single = cart_item(2, product(11, dec!(5), 3), 1);

        assert!(!at_stock.can_increment());
        assert!(at_stock.can_decrement());
        assert!(single.can_increment());
        assert!(!single.can_decrement());
    }

    #[test]
    fn payload_accepts_backend_subtotal() -> TestResult {
        let payload: CartPayload = serde_json::from_str(
            r#"{
                "id": 1,
                "items": [{
                    "id": 7,
                    "product": {"id": 3, "name": "Lamp", "price": "20.00", "stock": 5},
                    "quantity": 2,
                    "unit_price": "20.00",
                    "total_price": "40.00"
                }],
                "subtotal": "40.00",
                "total_items": 2
            }"#,
        )?;

        assert_eq!(payload.total, Some(dec!(40.00)));
        assert_eq!(Cart::from(payload).total(), dec!(40.00));

        Ok(())
    }

    #[test]
    fn empty_payload_is_an_empty_cart() -> TestResult {
        let payload: CartPayload = serde_json::from_str("{}")?;
        let cart = Cart::from(payload);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        Ok(())
    }
}

//! Test Helpers

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::prelude::OrderStatus;

use crate::{
    api::MockStorefrontApi,
    domain::{
        carts::{
            CartStore,
            models::{CartItem, CartItemId, CartPayload},
        },
        catalog::{
            CatalogStore,
            models::{Product, ProductId},
        },
        orders::{
            OrderStore,
            models::{Order, OrderDraft, OrderId, OrderItem, OrderItemId, ShippingAddress},
        },
    },
    mutations::Lanes,
};

pub(crate) fn product(id: u64, price: Decimal, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        price,
        original_price: None,
        stock,
        primary_image: None,
        images: Vec::new(),
        rating: None,
        review_count: 0,
        category_name: None,
        reviews: Vec::new(),
    }
}

pub(crate) fn cart_item(id: u64, product: Product, quantity: u32) -> CartItem {
    CartItem {
        id: CartItemId::new(id),
        product,
        quantity,
    }
}

/// Payload as the server sends it, with its own total.
pub(crate) fn cart_payload(items: Vec<CartItem>) -> CartPayload {
    let total = items
        .iter()
        .map(|item| item.product.price * Decimal::from(item.quantity))
        .sum();

    CartPayload {
        items,
        total: Some(total),
    }
}

pub(crate) fn order_item(id: u64, price: Decimal, quantity: u32) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        product: None,
        product_name: format!("Item {id}"),
        product_sku: None,
        quantity,
        price,
    }
}

pub(crate) fn order(id: u64, status: OrderStatus, items: Vec<OrderItem>) -> Order {
    let total_amount = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    Order {
        id: OrderId::new(id),
        order_number: Some(format!("ORD-{id:04}")),
        status,
        items,
        item_count: None,
        total_amount,
        shipping_cost: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        shipping_address: Some(shipping_address()),
        payment_reference: None,
        created_at: Timestamp::UNIX_EPOCH,
        delivered_at: None,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        address_line1: "1 Market Street".to_string(),
        address_line2: None,
        city: "Leeds".to_string(),
        state: "West Yorkshire".to_string(),
        zip_code: "LS1 1AA".to_string(),
        country: "GB".to_string(),
    }
}

pub(crate) fn order_draft() -> OrderDraft {
    OrderDraft {
        shipping_address: shipping_address(),
        payment_method_id: "pm_card_visa".to_string(),
        coupon_code: None,
    }
}

pub(crate) fn cart_store(api: MockStorefrontApi) -> CartStore {
    CartStore::new(Arc::new(api), Arc::new(Lanes::new()))
}

pub(crate) fn order_store(api: MockStorefrontApi) -> OrderStore {
    OrderStore::new(Arc::new(api), Arc::new(Lanes::new()))
}

pub(crate) fn catalog_store(api: MockStorefrontApi) -> CatalogStore {
    CatalogStore::new(Arc::new(api), Arc::new(Lanes::new()))
}

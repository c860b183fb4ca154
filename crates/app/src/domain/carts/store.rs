//! Cart store.

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront::prelude::{PricingPolicy, Summary};
use tokio::sync::watch;
use tracing::debug;

use crate::{
    api::StorefrontApi,
    domain::{
        carts::models::{AddToCart, Cart, CartItem, CartItemId},
        catalog::models::Product,
    },
    mutations::{Command, Coordinator, EntityKey, Lanes, MutationError, Snapshot},
};

/// Local mirror of the server cart.
pub struct CartStore {
    api: Arc<dyn StorefrontApi>,
    coordinator: Coordinator<Cart>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, lanes: Arc<Lanes>) -> Self {
        Self {
            api,
            coordinator: Coordinator::new(Cart::default(), lanes),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Cart> {
        self.coordinator.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Cart>> {
        self.coordinator.subscribe()
    }

    pub fn cart(&self) -> Cart {
        self.coordinator.read(Cart::clone)
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.coordinator.read(|cart| cart.items().to_vec())
    }

    pub fn total(&self) -> Decimal {
        self.coordinator.read(Cart::total)
    }

    pub fn item_count(&self) -> u32 {
        self.coordinator.read(Cart::item_count)
    }

    pub fn is_empty(&self) -> bool {
        self.coordinator.read(Cart::is_empty)
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<MutationError> {
        self.coordinator.snapshot().error
    }

    pub fn clear_error(&self) {
        self.coordinator.clear_error();
    }

    /// Whether the increment affordance for `item` is enabled.
    pub fn can_increment(&self, item: CartItemId) -> bool {
        self.coordinator
            .read(|cart| cart.item(item).is_some_and(CartItem::can_increment))
    }

    /// Whether the decrement affordance for `item` is enabled.
    pub fn can_decrement(&self, item: CartItemId) -> bool {
        self.coordinator
            .read(|cart| cart.item(item).is_some_and(CartItem::can_decrement))
    }

    pub fn summary(&self, policy: &PricingPolicy, discount: Decimal) -> Summary {
        self.coordinator
            .read(|cart| cart.summary(policy, discount))
    }

    /// Replace the cart with the server's.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server cannot be reached or refuses.
    #[tracing::instrument(name = "cart.store.fetch_cart", skip(self), err)]
    pub async fn fetch_cart(&self) -> Result<Cart, MutationError> {
        self.coordinator
            .dispatch(
                Command::FetchCart,
                EntityKey::Cart,
                self.api.get_cart(),
                |cart, payload| *cart = Cart::reconcile(payload),
            )
            .await
            .map(Cart::from)
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// # Errors
    ///
    /// - [`MutationError::Validation`]: `quantity` is zero, not dispatched.
    /// - [`MutationError::OutOfStock`]: the product has no stock, not dispatched.
    /// - [`MutationError::Stock`]: the server refused the quantity.
    #[tracing::instrument(
        name = "cart.store.add_to_cart",
        skip(self, product),
        fields(product = %product.id),
        err
    )]
    pub async fn add_to_cart(
        &self,
        product: &Product,
        quantity: u32,
    ) -> Result<Cart, MutationError> {
        if quantity < 1 {
            return Err(self.coordinator.reject(
                Command::AddToCart,
                MutationError::Validation("Quantity must be at least 1".to_string()),
            ));
        }

        if !product.in_stock() {
            return Err(self.coordinator.reject(
                Command::AddToCart,
                MutationError::OutOfStock(product.name.clone()),
            ));
        }

        let request = AddToCart {
            product_id: product.id,
            quantity,
        };

        self.coordinator
            .dispatch(
                Command::AddToCart,
                EntityKey::Cart,
                self.api.add_to_cart(request),
                |cart, payload| *cart = Cart::reconcile(payload),
            )
            .await
            .map(Cart::from)
    }

    /// Set the quantity of a cart line.
    ///
    /// The stock ceiling is left to the server; only quantities below one are
    /// refused locally.
    ///
    /// # Errors
    ///
    /// - [`MutationError::Validation`]: `quantity` is zero, not dispatched.
    /// - [`MutationError::Stock`]: the server refused the quantity.
    /// - [`MutationError::NotFound`]: the line no longer exists.
    #[tracing::instrument(name = "cart.store.update_cart_item", skip(self), err)]
    pub async fn update_cart_item(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Cart, MutationError> {
        if quantity < 1 {
            return Err(self.coordinator.reject(
                Command::UpdateCartItem,
                MutationError::Validation("Quantity must be at least 1".to_string()),
            ));
        }

        let stock = self
            .coordinator
            .read(|cart| cart.item(item).map(|line| line.product.stock));

        if let Some(stock) = stock
            && quantity > stock
        {
            debug!(quantity, stock, "quantity above known stock, deferring to server");
        }

        self.coordinator
            .dispatch(
                Command::UpdateCartItem,
                EntityKey::Cart,
                self.api.update_cart_item(item, quantity),
                |cart, payload| *cart = Cart::reconcile(payload),
            )
            .await
            .map(Cart::from)
    }

    /// Remove a cart line; the total is recomputed from the remaining lines.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server refuses the removal.
    #[tracing::instrument(name = "cart.store.remove_from_cart", skip(self), err)]
    pub async fn remove_from_cart(&self, item: CartItemId) -> Result<Cart, MutationError> {
        let removed = self
            .coordinator
            .dispatch(
                Command::RemoveFromCart,
                EntityKey::Cart,
                self.api.remove_cart_item(item),
                |cart, removed| *cart = cart.without(*removed),
            )
            .await?;

        debug!(%removed, "cart line removed");

        Ok(self.cart())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server refuses; the items are kept.
    #[tracing::instrument(name = "cart.store.clear_cart", skip(self), err)]
    pub async fn clear_cart(&self) -> Result<(), MutationError> {
        self.coordinator
            .dispatch(
                Command::ClearCart,
                EntityKey::Cart,
                self.api.clear_cart(),
                |cart, _| *cart = Cart::default(),
            )
            .await
    }
}

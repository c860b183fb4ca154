//! App Context

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront::prelude::{DiscountError, PricingPolicy, Summary};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{ApiError, HttpStorefrontApi, StorefrontApi},
    config::{ApiConfig, ConfigError, PricingConfig},
    domain::{
        carts::CartStore,
        catalog::CatalogStore,
        orders::{
            OrderStore,
            models::{AppliedCoupon, Order, OrderDraft},
        },
    },
    mutations::{Lanes, MutationError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build the storefront API client")]
    Http(#[source] ApiError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// The stores of one storefront session, sharing a collaborator and lanes.
#[derive(Clone)]
pub struct AppContext {
    pub cart: Arc<CartStore>,
    pub orders: Arc<OrderStore>,
    pub catalog: Arc<CatalogStore>,
    pub pricing: PricingPolicy,
}

impl AppContext {
    /// Build application context from parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the pricing settings are invalid or the HTTP
    /// client cannot be built.
    pub fn load(api: &ApiConfig, pricing: &PricingConfig) -> Result<Self, AppInitError> {
        Self::from_config(api, pricing.policy()?)
    }

    /// Build application context talking to the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(api: &ApiConfig, pricing: PricingPolicy) -> Result<Self, AppInitError> {
        let api = HttpStorefrontApi::new(api).map_err(AppInitError::Http)?;

        Ok(Self::with_api(Arc::new(api), pricing))
    }

    #[must_use]
    pub fn with_api(api: Arc<dyn StorefrontApi>, pricing: PricingPolicy) -> Self {
        let lanes = Arc::new(Lanes::new());

        Self {
            cart: Arc::new(CartStore::new(api.clone(), lanes.clone())),
            orders: Arc::new(OrderStore::new(api.clone(), lanes.clone())),
            catalog: Arc::new(CatalogStore::new(api, lanes)),
            pricing,
        }
    }

    /// Cart page summary, no coupon.
    pub fn cart_summary(&self) -> Summary {
        self.cart.summary(&self.pricing, Decimal::ZERO)
    }

    /// Checkout page summary, with the applied coupon repriced against the
    /// current cart. A coupon whose minimum the cart no longer meets counts
    /// as no discount; [`AppContext::coupon_discount`] reports why.
    pub fn checkout_summary(&self) -> Summary {
        let cart = self.cart.cart();

        let discount = self
            .orders
            .discount_for(cart.total())
            .unwrap_or_else(|error| {
                debug!(%error, "applied coupon no longer qualifies");
                Decimal::ZERO
            });

        cart.summary(&self.pricing, discount)
    }

    /// The applied coupon's discount on the current cart total, zero when no
    /// coupon is applied.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::MinimumPurchase`] when the cart has shrunk
    /// below the coupon's minimum since it was applied.
    pub fn coupon_discount(&self) -> Result<Decimal, DiscountError> {
        self.orders.discount_for(self.cart.total())
    }

    /// Price `code` against the current cart total.
    ///
    /// # Errors
    ///
    /// Returns the order store's rejection.
    pub async fn apply_coupon(&self, code: &str) -> Result<AppliedCoupon, MutationError> {
        self.orders.apply_coupon(code, self.cart.total()).await
    }

    /// Place an order for the current cart and refresh the cart afterwards.
    ///
    /// The applied coupon is sent when the draft names none. A failed cart
    /// refresh is logged; the order has been placed either way.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the create-order command.
    #[tracing::instrument(name = "context.checkout", skip(self, draft), err)]
    pub async fn checkout(&self, mut draft: OrderDraft) -> Result<Order, MutationError> {
        if draft.coupon_code.is_none() {
            draft.coupon_code = self.orders.applied_coupon().map(|coupon| coupon.code);
        }

        let order = self.orders.create_order(&self.cart.cart(), draft).await?;

        info!(order = %order.id, reference = %order.reference(), "order placed");

        if let Err(error) = self.cart.fetch_cart().await {
            warn!(%error, "cart refresh after checkout failed");
        }

        Ok(order)
    }
}

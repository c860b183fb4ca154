//! Order store.

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront::prelude::{DiscountError, calculate_discount};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    api::{Listing, Pagination, StorefrontApi},
    domain::{
        carts::models::Cart,
        orders::models::{AppliedCoupon, Order, OrderDraft, OrderId, Orders},
    },
    mutations::{
        Command, Coordinator, EntityKey, IntoRejection, Lanes, MutationError, Snapshot,
    },
};

/// Orders list, the order being viewed and the coupon applied at checkout.
pub struct OrderStore {
    api: Arc<dyn StorefrontApi>,
    coordinator: Coordinator<Orders>,
}

impl OrderStore {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, lanes: Arc<Lanes>) -> Self {
        Self {
            api,
            coordinator: Coordinator::new(Orders::default(), lanes),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Orders> {
        self.coordinator.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Orders>> {
        self.coordinator.subscribe()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.coordinator.read(|state| state.orders.clone())
    }

    pub fn pagination(&self) -> Pagination {
        self.coordinator.read(|state| state.pagination.clone())
    }

    pub fn order(&self) -> Option<Order> {
        self.coordinator.read(|state| state.order.clone())
    }

    pub fn applied_coupon(&self) -> Option<AppliedCoupon> {
        self.coordinator.read(|state| state.applied_coupon.clone())
    }

    /// Discount of the applied coupon repriced against `subtotal`, zero
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::MinimumPurchase`] once `subtotal` drops below
    /// the coupon's minimum.
    pub fn discount_for(&self, subtotal: Decimal) -> Result<Decimal, DiscountError> {
        self.coordinator.read(|state| {
            state
                .applied_coupon
                .as_ref()
                .map_or(Ok(Decimal::ZERO), |coupon| coupon.discount_for(subtotal))
        })
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<MutationError> {
        self.coordinator.snapshot().error
    }

    pub fn clear_order(&self) {
        self.coordinator.update(|state| state.order = None);
    }

    pub fn clear_error(&self) {
        self.coordinator.clear_error();
    }

    pub fn clear_coupon(&self) {
        self.coordinator.update(|state| state.applied_coupon = None);
    }

    /// Place an order for the contents of `cart`.
    ///
    /// # Errors
    ///
    /// - [`MutationError::EmptyCart`]: nothing to order, not dispatched.
    /// - [`MutationError::Validation`]: a required draft field is blank, not dispatched.
    /// - Any server rejection (payment, address, stock at order time).
    #[tracing::instrument(
        name = "orders.store.create_order",
        skip(self, cart, draft),
        fields(items = cart.items().len()),
        err
    )]
    pub async fn create_order(
        &self,
        cart: &Cart,
        draft: OrderDraft,
    ) -> Result<Order, MutationError> {
        if cart.is_empty() {
            return Err(self
                .coordinator
                .reject(Command::CreateOrder, MutationError::EmptyCart));
        }

        if let Some(field) = draft.missing_field() {
            return Err(self.coordinator.reject(
                Command::CreateOrder,
                MutationError::Validation(format!("{field} is required")),
            ));
        }

        let draft = OrderDraft {
            coupon_code: draft
                .coupon_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            ..draft
        };

        self.coordinator
            .dispatch(
                Command::CreateOrder,
                EntityKey::Cart,
                self.api.create_order(draft),
                |state, order| {
                    check_totals(order);
                    state.order = Some(order.clone());
                    state.applied_coupon = None;
                },
            )
            .await
    }

    /// Load the first page of the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server cannot be reached or refuses.
    #[tracing::instrument(name = "orders.store.fetch_orders", skip(self), err)]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, MutationError> {
        self.load_orders(None).await
    }

    /// Load a specific page of the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] for a page past the end.
    #[tracing::instrument(name = "orders.store.fetch_orders_page", skip(self), err)]
    pub async fn fetch_orders_page(&self, page: u32) -> Result<Vec<Order>, MutationError> {
        self.load_orders(Some(page)).await
    }

    async fn load_orders(&self, page: Option<u32>) -> Result<Vec<Order>, MutationError> {
        let request = async {
            self.api
                .list_orders(page)
                .await
                .map(Listing::into_page)
        };

        self.coordinator
            .dispatch(
                Command::FetchOrders,
                EntityKey::OrderList,
                request,
                |state, page| {
                    for order in &page.results {
                        let previous = state.orders.iter().find(|known| known.id == order.id);

                        if let Some(previous) = previous {
                            check_status(previous, order);
                        }

                        check_totals(order);
                    }

                    state.orders.clone_from(&page.results);
                    state.pagination = page.pagination.clone();
                },
            )
            .await
            .map(|page| page.results)
    }

    /// Load one order in full.
    ///
    /// Every detail fetch shares one lane, so the order requested last is
    /// the one left on screen.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if the order does not exist or
    /// belongs to someone else.
    #[tracing::instrument(name = "orders.store.fetch_order_by_id", skip(self), err)]
    pub async fn fetch_order_by_id(&self, id: OrderId) -> Result<Order, MutationError> {
        self.coordinator
            .dispatch(
                Command::FetchOrderById,
                EntityKey::OrderDetail,
                self.api.get_order(id),
                |state, order| {
                    let previous = state
                        .order
                        .iter()
                        .chain(state.orders.iter())
                        .find(|known| known.id == order.id);

                    if let Some(previous) = previous {
                        check_status(previous, order);
                    }

                    check_totals(order);

                    let listed = state.orders.iter_mut().find(|listed| listed.id == order.id);

                    if let Some(listed) = listed {
                        listed.clone_from(order);
                    }

                    state.order = Some(order.clone());
                },
            )
            .await
    }

    /// Ask the server to validate `code` and price it against `subtotal`.
    ///
    /// # Errors
    ///
    /// - [`MutationError::Validation`]: blank code (not dispatched), or a
    ///   subtotal below the coupon's minimum purchase.
    /// - Any server rejection of the code.
    #[tracing::instrument(name = "orders.store.apply_coupon", skip(self), err)]
    pub async fn apply_coupon(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedCoupon, MutationError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(self.coordinator.reject(
                Command::ApplyCoupon,
                MutationError::Validation("Please enter a coupon code".to_string()),
            ));
        }

        let request = async {
            let payload = self
                .api
                .apply_coupon(code.to_string())
                .await
                .map_err(|error| error.into_rejection(Command::ApplyCoupon))?;

            let coupon = payload.coupon();
            let discount = calculate_discount(&coupon, subtotal)?;

            Ok::<_, MutationError>(AppliedCoupon {
                code: payload.code,
                description: payload.description,
                coupon,
                discount,
            })
        };

        self.coordinator
            .dispatch(
                Command::ApplyCoupon,
                EntityKey::Cart,
                request,
                |state, applied| state.applied_coupon = Some(applied.clone()),
            )
            .await
    }
}

fn check_status(previous: &Order, current: &Order) {
    if previous.status == current.status {
        return;
    }

    match previous.status.transition(current.status) {
        Ok(status) => debug!(
            order = %current.id,
            from = %previous.status,
            to = %status,
            "order status advanced"
        ),
        Err(error) => warn!(
            order = %current.id,
            %error,
            "server reported a non-sequential status change"
        ),
    }
}

fn check_totals(order: &Order) {
    if order.items.is_empty() {
        return;
    }

    if let Err(mismatch) = order.verify_totals() {
        warn!(
            order = %order.id,
            expected = %mismatch.expected,
            reported = %mismatch.reported,
            "order totals do not add up"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use storefront::prelude::OrderStatus;
    use testresult::TestResult;
    use tokio::time::timeout;

    use crate::{
        api::{ApiError, MockStorefrontApi, Page},
        domain::orders::models::{CouponPayload, DiscountType},
        test::helpers::{cart_item, order, order_draft, order_item, order_store, product},
    };

    use super::*;

    fn cart() -> Cart {
        Cart::new(vec![cart_item(1, product(10, dec!(20), 5), 2)])
    }

    fn coupon(discount_type: DiscountType, value: Decimal, min_purchase: Decimal) -> CouponPayload {
        CouponPayload {
            code: "SAVE10".to_string(),
            description: "Spring sale".to_string(),
            discount_type,
            discount_value: value,
            min_purchase,
            valid_from: None,
            valid_to: None,
        }
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_dispatch() {
        let mut api = MockStorefrontApi::new();
        api.expect_create_order().never();

        let store = order_store(api);
        let result = store.create_order(&Cart::default(), order_draft()).await;

        assert_eq!(result, Err(MutationError::EmptyCart));
        assert_eq!(store.error(), Some(MutationError::EmptyCart));
        assert_eq!(store.order(), None);
    }

    #[tokio::test]
    async fn blank_address_is_rejected_without_dispatch() {
        let mut api = MockStorefrontApi::new();
        api.expect_create_order().never();

        let store = order_store(api);
        let mut draft = order_draft();
        draft.shipping_address.zip_code = String::new();

        let result = store.create_order(&cart(), draft).await;

        assert_eq!(
            result,
            Err(MutationError::Validation("ZIP code is required".to_string()))
        );
    }

    #[tokio::test]
    async fn created_order_is_stored() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let created = order(42, OrderStatus::Pending, vec![order_item(1, dec!(20), 2)]);
        let expected = created.clone();

        api.expect_create_order()
            .once()
            .withf(|draft| draft.coupon_code.as_deref() == Some("SAVE10"))
            .return_once(move |_| Ok(created));

        let store = order_store(api);
        let mut draft = order_draft();
        draft.coupon_code = Some(" SAVE10 ".to_string());

        let order = store.create_order(&cart(), draft).await?;

        assert_eq!(order, expected);
        assert_eq!(store.order(), Some(expected));
        assert!(!store.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn blank_coupon_code_is_not_sent() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let created = order(43, OrderStatus::Pending, vec![order_item(1, dec!(20), 2)]);

        api.expect_create_order()
            .once()
            .withf(|draft| draft.coupon_code.is_none())
            .return_once(move |_| Ok(created));

        let store = order_store(api);
        let mut draft = order_draft();
        draft.coupon_code = Some("   ".to_string());

        store.create_order(&cart(), draft).await?;

        Ok(())
    }

    #[tokio::test]
    async fn payment_failure_leaves_no_order() {
        let mut api = MockStorefrontApi::new();

        api.expect_create_order().once().return_once(|_| {
            Err(ApiError::Status {
                path: "/orders/".to_string(),
                status: 402,
                detail: json!({"detail": "Your card was declined."}),
            })
        });

        let store = order_store(api);
        let result = store.create_order(&cart(), order_draft()).await;

        assert!(
            matches!(
                result,
                Err(MutationError::Server { status: 402, ref message, .. })
                    if message == "Your card was declined."
            ),
            "expected Server, got {result:?}"
        );
        assert_eq!(store.order(), None);
    }

    #[tokio::test]
    async fn fetch_orders_accepts_bare_list() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let orders = vec![
            order(2, OrderStatus::Shipped, Vec::new()),
            order(1, OrderStatus::Delivered, Vec::new()),
        ];

        api.expect_list_orders()
            .once()
            .withf(|page| page.is_none())
            .return_once(move |_| Ok(Listing::List(orders)));

        let store = order_store(api);
        let orders = store.fetch_orders().await?;

        assert_eq!(orders.len(), 2);
        assert_eq!(store.orders().len(), 2);
        assert_eq!(store.pagination().count, 2);
        assert!(!store.pagination().has_next());

        Ok(())
    }

    #[tokio::test]
    async fn fetch_orders_page_keeps_cursors() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_list_orders()
            .once()
            .withf(|page| *page == Some(2))
            .return_once(|_| {
                Ok(Listing::Page(Page {
                    results: vec![order(11, OrderStatus::Pending, Vec::new())],
                    pagination: Pagination {
                        count: 21,
                        next: Some("/orders/?page=3".to_string()),
                        previous: Some("/orders/?page=1".to_string()),
                    },
                }))
            });

        let store = order_store(api);
        store.fetch_orders_page(2).await?;

        assert_eq!(store.pagination().count, 21);
        assert!(store.pagination().has_next());
        assert_eq!(
            store.orders().first().map(|order| order.id),
            Some(OrderId::new(11))
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let known = order(1, OrderStatus::Pending, vec![order_item(1, dec!(5), 1)]);
        let cached = known.clone();

        api.expect_get_order()
            .withf(|id| *id == OrderId::new(1))
            .return_once(move |_| Ok(known));
        api.expect_get_order()
            .withf(|id| *id == OrderId::new(999))
            .return_once(|_| {
                Err(ApiError::Status {
                    path: "/orders/999/".to_string(),
                    status: 404,
                    detail: json!({"detail": "Not found."}),
                })
            });

        let store = order_store(api);
        store.fetch_order_by_id(OrderId::new(1)).await?;

        let result = store.fetch_order_by_id(OrderId::new(999)).await;

        assert_eq!(
            result,
            Err(MutationError::NotFound {
                message: "Not found.".to_string(),
                detail: json!({"detail": "Not found."}),
            })
        );
        assert_eq!(store.order(), Some(cached));

        Ok(())
    }

    #[tokio::test]
    async fn server_status_is_authoritative() -> TestResult {
        let mut api = MockStorefrontApi::new();
        let mut responses = vec![
            order(5, OrderStatus::Delivered, Vec::new()),
            order(5, OrderStatus::Pending, Vec::new()),
        ];

        api.expect_get_order()
            .times(2)
            .returning(move |_| responses.pop().ok_or_else(|| ApiError::Status {
                path: "/orders/5/".to_string(),
                status: 500,
                detail: Value::Null,
            }));

        let store = order_store(api);

        store.fetch_order_by_id(OrderId::new(5)).await?;
        let order = store.fetch_order_by_id(OrderId::new(5)).await?;

        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(
            store.order().map(|order| order.status),
            Some(OrderStatus::Delivered)
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_details_queue_on_one_lane() {
        let mut api = MockStorefrontApi::new();

        api.expect_get_order()
            .times(0..=2)
            .returning(|id| Ok(order(id.into_inner(), OrderStatus::Pending, Vec::new())));

        let lanes = Arc::new(Lanes::new());
        let store = OrderStore::new(Arc::new(api), Arc::clone(&lanes));
        let viewing = lanes.acquire(EntityKey::OrderDetail).await;

        for id in [1, 2] {
            let blocked = timeout(
                Duration::from_millis(20),
                store.fetch_order_by_id(OrderId::new(id)),
            )
            .await;

            assert!(blocked.is_err(), "order {id} should wait for the detail lane");
        }

        drop(viewing);

        assert_eq!(store.order(), None);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn fetched_detail_refreshes_list_entry() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_list_orders()
            .once()
            .return_once(|_| {
                Ok(Listing::List(vec![order(
                    7,
                    OrderStatus::Processing,
                    Vec::new(),
                )]))
            });
        api.expect_get_order()
            .once()
            .return_once(|_| {
                Ok(order(
                    7,
                    OrderStatus::Shipped,
                    vec![order_item(1, dec!(9.99), 1)],
                ))
            });

        let store = order_store(api);
        store.fetch_orders().await?;
        store.fetch_order_by_id(OrderId::new(7)).await?;

        assert_eq!(
            store.orders().first().map(|order| order.status),
            Some(OrderStatus::Shipped)
        );

        Ok(())
    }

    #[tokio::test]
    async fn percentage_coupon_is_priced_against_subtotal() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon()
            .once()
            .withf(|code| code == "SAVE10")
            .return_once(|_| Ok(coupon(DiscountType::Percentage, dec!(10), dec!(50))));

        let store = order_store(api);
        let applied = store.apply_coupon(" SAVE10 ", dec!(60)).await?;

        assert_eq!(applied.discount, dec!(6));
        assert_eq!(store.discount_for(dec!(60)), Ok(dec!(6)));
        assert_eq!(store.discount_for(dec!(80)), Ok(dec!(8)));
        assert_eq!(
            store.discount_for(dec!(40)),
            Err(DiscountError::MinimumPurchase {
                required: dec!(50),
                subtotal: dec!(40),
            })
        );
        assert_eq!(
            store.applied_coupon().map(|coupon| coupon.code),
            Some("SAVE10".to_string())
        );

        store.clear_coupon();
        assert_eq!(store.discount_for(dec!(60)), Ok(Decimal::ZERO));

        Ok(())
    }

    #[tokio::test]
    async fn coupon_below_minimum_purchase_is_rejected() {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon()
            .once()
            .return_once(|_| Ok(coupon(DiscountType::Fixed, dec!(5), dec!(50))));

        let store = order_store(api);
        let result = store.apply_coupon("SAVE10", dec!(20)).await;

        assert!(
            matches!(result, Err(MutationError::Validation(_))),
            "expected Validation, got {result:?}"
        );
        assert_eq!(store.applied_coupon(), None);
    }

    #[tokio::test]
    async fn invalid_coupon_uses_server_detail() {
        let mut api = MockStorefrontApi::new();

        api.expect_apply_coupon().once().return_once(|_| {
            Err(ApiError::Status {
                path: "/orders/apply-coupon/".to_string(),
                status: 400,
                detail: Value::Null,
            })
        });

        let store = order_store(api);
        let result = store.apply_coupon("NOPE", dec!(20)).await;

        assert_eq!(
            result.map_err(|error| error.to_string()),
            Err("Invalid coupon code".to_string())
        );
    }

    #[tokio::test]
    async fn blank_coupon_is_rejected_without_dispatch() {
        let mut api = MockStorefrontApi::new();
        api.expect_apply_coupon().never();

        let store = order_store(api);
        let result = store.apply_coupon("  ", dec!(20)).await;

        assert!(
            matches!(result, Err(MutationError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn clear_order_and_error_are_local() -> TestResult {
        let mut api = MockStorefrontApi::new();

        api.expect_get_order()
            .once()
            .return_once(|_| Ok(order(3, OrderStatus::Pending, Vec::new())));
        api.expect_create_order().never();

        let store = order_store(api);
        store.fetch_order_by_id(OrderId::new(3)).await?;

        let _ = store.create_order(&Cart::default(), order_draft()).await;
        assert!(store.error().is_some());

        store.clear_error();
        store.clear_order();

        assert_eq!(store.error(), None);
        assert_eq!(store.order(), None);

        Ok(())
    }
}

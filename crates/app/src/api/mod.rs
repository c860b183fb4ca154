//! Storefront API
//!
//! The remote collaborator every store dispatches to. [`HttpStorefrontApi`]
//! talks to the real server; tests use the generated `MockStorefrontApi`.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    carts::models::{AddToCart, CartItemId, CartPayload},
    catalog::models::{Category, NewReview, Product, ProductFilters, ProductId, Review},
    orders::models::{CouponPayload, Order, OrderDraft, OrderId},
};

pub mod errors;
pub mod http;
pub mod pagination;

pub use errors::ApiError;
pub use http::HttpStorefrontApi;
pub use pagination::{Listing, Page, Pagination};

#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /cart/`
    async fn get_cart(&self) -> Result<CartPayload, ApiError>;

    /// `POST /cart/add/`
    async fn add_to_cart(&self, request: AddToCart) -> Result<CartPayload, ApiError>;

    /// `PATCH /cart/items/{item}/`
    async fn update_cart_item(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartPayload, ApiError>;

    /// `DELETE /cart/items/{item}/`, acknowledged with the removed id.
    async fn remove_cart_item(&self, item: CartItemId) -> Result<CartItemId, ApiError>;

    /// `DELETE /cart/clear/`
    async fn clear_cart(&self) -> Result<(), ApiError>;

    /// `POST /orders/`
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, ApiError>;

    /// `GET /orders/`, optionally a specific page.
    async fn list_orders(&self, page: Option<u32>) -> Result<Listing<Order>, ApiError>;

    /// `GET /orders/{order}/`
    async fn get_order(&self, order: OrderId) -> Result<Order, ApiError>;

    /// `POST /orders/apply-coupon/`
    async fn apply_coupon(&self, code: String) -> Result<CouponPayload, ApiError>;

    /// `GET /products/?<filters>`
    async fn list_products(&self, filters: ProductFilters) -> Result<Page<Product>, ApiError>;

    /// `GET /products/{product}/`
    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError>;

    /// `GET /products/categories/`
    async fn list_categories(&self) -> Result<Listing<Category>, ApiError>;

    /// `POST /products/{product}/reviews/`
    async fn add_review(&self, product: ProductId, review: NewReview) -> Result<Review, ApiError>;
}

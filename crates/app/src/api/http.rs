//! HTTP client for the storefront REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    api::{ApiError, Listing, Page, StorefrontApi},
    config::ApiConfig,
    domain::{
        carts::models::{AddToCart, CartItemId, CartPayload},
        catalog::models::{Category, NewReview, Product, ProductFilters, ProductId, Review},
        orders::models::{CouponPayload, Order, OrderDraft, OrderId},
    },
};

/// [`StorefrontApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base_url));

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(path, status = status.as_u16(), "storefront response");

        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                detail: parse_detail(&body),
            });
        }

        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(path, request).await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    #[tracing::instrument(name = "api.http.get_cart", skip(self), err)]
    async fn get_cart(&self) -> Result<CartPayload, ApiError> {
        let path = "/cart/";

        self.fetch(path, self.request(Method::GET, path)).await
    }

    #[tracing::instrument(name = "api.http.add_to_cart", skip(self), err)]
    async fn add_to_cart(&self, request: AddToCart) -> Result<CartPayload, ApiError> {
        let path = "/cart/add/";

        self.fetch(path, self.request(Method::POST, path).json(&request))
            .await
    }

    #[tracing::instrument(name = "api.http.update_cart_item", skip(self), err)]
    async fn update_cart_item(
        &self,
        item: CartItemId,
        quantity: u32,
    ) -> Result<CartPayload, ApiError> {
        let path = format!("/cart/items/{item}/");
        let body = json!({ "quantity": quantity });

        self.fetch(&path, self.request(Method::PATCH, &path).json(&body))
            .await
    }

    #[tracing::instrument(name = "api.http.remove_cart_item", skip(self), err)]
    async fn remove_cart_item(&self, item: CartItemId) -> Result<CartItemId, ApiError> {
        let path = format!("/cart/items/{item}/");

        self.send(&path, self.request(Method::DELETE, &path))
            .await?;

        Ok(item)
    }

    #[tracing::instrument(name = "api.http.clear_cart", skip(self), err)]
    async fn clear_cart(&self) -> Result<(), ApiError> {
        let path = "/cart/clear/";

        self.send(path, self.request(Method::DELETE, path)).await?;

        Ok(())
    }

    #[tracing::instrument(name = "api.http.create_order", skip(self, draft), err)]
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, ApiError> {
        let path = "/orders/";

        self.fetch(path, self.request(Method::POST, path).json(&draft))
            .await
    }

    #[tracing::instrument(name = "api.http.list_orders", skip(self), err)]
    async fn list_orders(&self, page: Option<u32>) -> Result<Listing<Order>, ApiError> {
        let path = "/orders/";
        let mut request = self.request(Method::GET, path);

        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        self.fetch(path, request).await
    }

    #[tracing::instrument(name = "api.http.get_order", skip(self), err)]
    async fn get_order(&self, order: OrderId) -> Result<Order, ApiError> {
        let path = format!("/orders/{order}/");

        self.fetch(&path, self.request(Method::GET, &path)).await
    }

    #[tracing::instrument(name = "api.http.apply_coupon", skip(self), err)]
    async fn apply_coupon(&self, code: String) -> Result<CouponPayload, ApiError> {
        let path = "/orders/apply-coupon/";
        let body = json!({ "code": code });

        self.fetch(path, self.request(Method::POST, path).json(&body))
            .await
    }

    #[tracing::instrument(name = "api.http.list_products", skip(self), err)]
    async fn list_products(&self, filters: ProductFilters) -> Result<Page<Product>, ApiError> {
        let path = "/products/";

        self.fetch(
            path,
            self.request(Method::GET, path).query(&filters.query()),
        )
        .await
    }

    #[tracing::instrument(name = "api.http.get_product", skip(self), err)]
    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError> {
        let path = format!("/products/{product}/");

        self.fetch(&path, self.request(Method::GET, &path)).await
    }

    #[tracing::instrument(name = "api.http.list_categories", skip(self), err)]
    async fn list_categories(&self) -> Result<Listing<Category>, ApiError> {
        let path = "/products/categories/";

        self.fetch(path, self.request(Method::GET, path)).await
    }

    #[tracing::instrument(name = "api.http.add_review", skip(self, review), err)]
    async fn add_review(&self, product: ProductId, review: NewReview) -> Result<Review, ApiError> {
        let path = format!("/products/{product}/reviews/");

        self.fetch(&path, self.request(Method::POST, &path).json(&review))
            .await
    }
}

fn parse_detail(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_detail_keeps_json_bodies() {
        assert_eq!(
            parse_detail(br#"{"detail": "Not found."}"#),
            json!({"detail": "Not found."})
        );
    }

    #[test]
    fn parse_detail_wraps_plain_text() {
        assert_eq!(
            parse_detail(b"Bad Gateway"),
            Value::String("Bad Gateway".to_string())
        );
        assert_eq!(parse_detail(b""), Value::Null);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() -> TestResult {
        let api = HttpStorefrontApi::new(&ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            token: None,
            timeout_seconds: 5,
        })?;

        assert_eq!(api.base_url, "http://localhost:8000/api");

        Ok(())
    }
}

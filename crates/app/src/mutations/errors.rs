//! Mutation Errors

use serde_json::Value;
use storefront::prelude::DiscountError;
use thiserror::Error;

use crate::api::{ApiError, errors::detail_message};

/// Commands dispatched through the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    FetchCart,
    AddToCart,
    UpdateCartItem,
    RemoveFromCart,
    ClearCart,
    CreateOrder,
    FetchOrders,
    FetchOrderById,
    ApplyCoupon,
    FetchProducts,
    FetchProduct,
    FetchCategories,
    AddReview,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::FetchCart => "cart/fetch",
            Command::AddToCart => "cart/add",
            Command::UpdateCartItem => "cart/update",
            Command::RemoveFromCart => "cart/remove",
            Command::ClearCart => "cart/clear",
            Command::CreateOrder => "orders/create",
            Command::FetchOrders => "orders/fetch_all",
            Command::FetchOrderById => "orders/fetch_by_id",
            Command::ApplyCoupon => "orders/apply_coupon",
            Command::FetchProducts => "products/fetch_all",
            Command::FetchProduct => "products/fetch_by_id",
            Command::FetchCategories => "products/fetch_categories",
            Command::AddReview => "products/add_review",
        }
    }

    /// Message shown when the server gives no usable detail.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Command::FetchCart => "Failed to fetch cart",
            Command::AddToCart => "Failed to add to cart",
            Command::UpdateCartItem => "Failed to update cart",
            Command::RemoveFromCart => "Failed to remove from cart",
            Command::ClearCart => "Failed to clear cart",
            Command::CreateOrder => "Failed to create order",
            Command::FetchOrders => "Failed to fetch orders",
            Command::FetchOrderById => "Failed to fetch order",
            Command::ApplyCoupon => "Invalid coupon code",
            Command::FetchProducts => "Failed to fetch products",
            Command::FetchProduct => "Failed to fetch product",
            Command::FetchCategories => "Failed to fetch categories",
            Command::AddReview => "Failed to add review",
        }
    }

    /// Whether a `400` from the server means the quantity exceeded stock.
    fn rejects_on_stock(self) -> bool {
        matches!(self, Command::AddToCart | Command::UpdateCartItem)
    }
}

/// Rejection value recorded in a store snapshot.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    /// A required field is missing or invalid; raised before dispatch.
    #[error("{0}")]
    Validation(String),

    /// The product has no stock; raised before dispatch.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// The requested quantity exceeds available stock.
    #[error("{message}")]
    Stock { message: String, detail: Value },

    /// Checkout was attempted with an empty cart; raised before dispatch.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Unknown cart item, order or product.
    #[error("{message}")]
    NotFound { message: String, detail: Value },

    /// The server could not be reached or answered with garbage.
    #[error("{0}")]
    Network(String),

    /// The server rejected the request.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        detail: Value,
    },
}

impl MutationError {
    /// Classify a collaborator failure for `command`.
    pub fn from_api(command: Command, error: ApiError) -> Self {
        match error {
            ApiError::Status {
                status, detail, ..
            } => {
                let message = detail_message(&detail)
                    .unwrap_or_else(|| command.fallback_message().to_string());

                match status {
                    404 => MutationError::NotFound { message, detail },
                    400 if command.rejects_on_stock() => MutationError::Stock { message, detail },
                    _ => MutationError::Server {
                        status,
                        message,
                        detail,
                    },
                }
            }
            ApiError::Http(error) => {
                MutationError::Network(format!("{}: {error}", command.fallback_message()))
            }
            ApiError::Decode(error) => {
                MutationError::Network(format!("{}: {error}", command.fallback_message()))
            }
        }
    }

    /// Server-provided detail, when the rejection came from the server.
    pub fn detail(&self) -> Option<&Value> {
        match self {
            MutationError::Stock { detail, .. }
            | MutationError::NotFound { detail, .. }
            | MutationError::Server { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Whether the rejection was raised locally without a network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            MutationError::Validation(_) | MutationError::OutOfStock(_) | MutationError::EmptyCart
        )
    }
}

impl From<DiscountError> for MutationError {
    fn from(error: DiscountError) -> Self {
        MutationError::Validation(error.to_string())
    }
}

/// Failure of a dispatched request, turned into a rejection for a command.
pub trait IntoRejection {
    fn into_rejection(self, command: Command) -> MutationError;
}

impl IntoRejection for ApiError {
    fn into_rejection(self, command: Command) -> MutationError {
        MutationError::from_api(command, self)
    }
}

impl IntoRejection for MutationError {
    fn into_rejection(self, _command: Command) -> MutationError {
        self
    }
}

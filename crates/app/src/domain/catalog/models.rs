//! Catalog Models

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{api::pagination::Pagination, ids::TypedId};

pub type ProductId = TypedId<Product>;
pub type ProductImageId = TypedId<ProductImage>;
pub type CategoryId = TypedId<Category>;
pub type ReviewId = TypedId<Review>;

/// Product Model
///
/// Listing payloads omit `images` and `reviews`; the detail payload carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: Decimal,
    #[serde(default, alias = "compare_price")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default, alias = "average_rating")]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Image to show for the product: the listing's primary image, then the
    /// image flagged primary, then the first one.
    pub fn image(&self) -> Option<&str> {
        self.primary_image.as_deref().or_else(|| {
            self.images
                .iter()
                .find(|image| image.is_primary)
                .or_else(|| self.images.first())
                .map(|image| image.image.as_str())
        })
    }

    /// Whole-percent saving against the original price, when marked down.
    pub fn discount_percent(&self) -> Option<Decimal> {
        let original = self.original_price?;

        if original <= self.price || original.is_zero() {
            return None;
        }

        let percent = (original - self.price) / original * Decimal::ONE_HUNDRED;

        Some(percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// ProductImage Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub image: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Category Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// Review Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub user_name: String,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// NewReview Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub rating: u8,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub comment: String,
}

impl NewReview {
    pub const RATINGS: std::ops::RangeInclusive<u8> = 1..=5;

    /// First problem that would make the server reject the review.
    pub fn problem(&self) -> Option<&'static str> {
        if !Self::RATINGS.contains(&self.rating) {
            return Some("Rating must be between 1 and 5");
        }

        if self.comment.trim().is_empty() {
            return Some("Comment is required");
        }

        None
    }
}

/// Product listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: bool,
    pub ordering: String,
    pub page: Option<u32>,
}

impl ProductFilters {
    pub const DEFAULT_ORDERING: &'static str = "-created_at";

    /// Query-string pairs, skipping unset filters.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query.push(("search", search.to_string()));
        }

        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }

        if let Some(min_price) = self.min_price {
            query.push(("min_price", min_price.to_string()));
        }

        if let Some(max_price) = self.max_price {
            query.push(("max_price", max_price.to_string()));
        }

        if self.in_stock {
            query.push(("in_stock", "true".to_string()));
        }

        if !self.ordering.is_empty() {
            query.push(("ordering", self.ordering.clone()));
        }

        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }

        query
    }
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            in_stock: false,
            ordering: Self::DEFAULT_ORDERING.to_string(),
            page: None,
        }
    }
}

/// Catalog state mirrored from the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub product: Option<Product>,
    pub categories: Vec<Category>,
    pub filters: ProductFilters,
}

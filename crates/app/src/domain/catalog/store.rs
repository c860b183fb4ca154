//! Catalog store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::{
    api::{Listing, Pagination, StorefrontApi},
    domain::catalog::models::{
        Catalog, Category, NewReview, Product, ProductFilters, ProductId, Review,
    },
    mutations::{Command, Coordinator, EntityKey, Lanes, MutationError, Snapshot},
};

/// Product listing, product detail and the category tree.
pub struct CatalogStore {
    api: Arc<dyn StorefrontApi>,
    coordinator: Coordinator<Catalog>,
}

impl CatalogStore {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, lanes: Arc<Lanes>) -> Self {
        Self {
            api,
            coordinator: Coordinator::new(Catalog::default(), lanes),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Catalog> {
        self.coordinator.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Catalog>> {
        self.coordinator.subscribe()
    }

    pub fn products(&self) -> Vec<Product> {
        self.coordinator.read(|catalog| catalog.products.clone())
    }

    pub fn pagination(&self) -> Pagination {
        self.coordinator.read(|catalog| catalog.pagination.clone())
    }

    pub fn product(&self) -> Option<Product> {
        self.coordinator.read(|catalog| catalog.product.clone())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.coordinator.read(|catalog| catalog.categories.clone())
    }

    pub fn filters(&self) -> ProductFilters {
        self.coordinator.read(|catalog| catalog.filters.clone())
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

    /// Replace the stored filters without fetching.
    pub fn set_filters(&self, filters: ProductFilters) {
        self.coordinator.update(|catalog| catalog.filters = filters);
    }

    pub fn clear_filters(&self) {
        self.coordinator
            .update(|catalog| catalog.filters = ProductFilters::default());
    }

    pub fn clear_product_detail(&self) {
        self.coordinator.update(|catalog| catalog.product = None);
    }

    /// Load a page of products matching `filters` and remember the filters.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server cannot be reached or refuses.
    #[tracing::instrument(name = "catalog.store.fetch_products", skip(self), err)]
    pub async fn fetch_products(
        &self,
        filters: ProductFilters,
    ) -> Result<Vec<Product>, MutationError> {
        self.coordinator
            .dispatch(
                Command::FetchProducts,
                EntityKey::Catalog,
                self.api.list_products(filters.clone()),
                |catalog, page| {
                    catalog.products.clone_from(&page.results);
                    catalog.pagination = page.pagination.clone();
                    catalog.filters = filters;
                },
            )
            .await
            .map(|page| page.results)
    }

    /// Load one product with its images and reviews.
    ///
    /// Detail fetches and reviews share one lane, so the product requested
    /// last is the one left on screen.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] for an unknown product.
    #[tracing::instrument(name = "catalog.store.fetch_product", skip(self), err)]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, MutationError> {
        self.coordinator
            .dispatch(
                Command::FetchProduct,
                EntityKey::ProductDetail,
                self.api.get_product(id),
                |catalog, product| catalog.product = Some(product.clone()),
            )
            .await
    }

    /// Load the category tree.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the server cannot be reached or refuses.
    #[tracing::instrument(name = "catalog.store.fetch_categories", skip(self), err)]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, MutationError> {
        let request = async {
            self.api
                .list_categories()
                .await
                .map(|listing| Listing::into_page(listing).results)
        };

        self.coordinator
            .dispatch(
                Command::FetchCategories,
                EntityKey::Catalog,
                request,
                |catalog, categories| catalog.categories.clone_from(categories),
            )
            .await
    }

    /// Post a review for `product`.
    ///
    /// # Errors
    ///
    /// - [`MutationError::Validation`]: rating outside `1..=5` or a blank
    ///   comment, not dispatched.
    /// - Any server rejection, for example a second review by the same user.
    #[tracing::instrument(
        name = "catalog.store.add_review",
        skip(self, review),
        fields(rating = review.rating),
        err
    )]
    pub async fn add_review(
        &self,
        product: ProductId,
        review: NewReview,
    ) -> Result<Review, MutationError> {
        if let Some(problem) = review.problem() {
            return Err(self.coordinator.reject(
                Command::AddReview,
                MutationError::Validation(problem.to_string()),
            ));
        }

        self.coordinator
            .dispatch(
                Command::AddReview,
                EntityKey::ProductDetail,
                self.api.add_review(product, review),
                |catalog, created| {
                    if let Some(detail) = catalog.product.as_mut()
                        && detail.id == product
                    {
                        detail.reviews.insert(0, created.clone());
                        detail.review_count += 1;
                    } else {
                        debug!(%product, "review created for a product not on screen");
                    }
                },
            )
            .await
    }
}

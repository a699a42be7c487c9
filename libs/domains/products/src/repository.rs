use async_trait::async_trait;
use database::{Pagination, SortDirection};
use rust_decimal::Decimal;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductSales, UpdateProduct};

/// Repository trait for Product persistence
///
/// Identifiers are opaque strings. Implementations reject ones they cannot
/// parse with [`ProductError::InvalidId`](crate::ProductError::InvalidId),
/// which is distinct from a well-formed id that matches nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// Overwrites all mutable fields; `NotFound` when nothing matches.
    async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product>;

    /// `NotFound` when nothing was deleted.
    async fn delete(&self, id: &str) -> ProductResult<()>;

    /// Unfiltered page in store order.
    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>>;

    /// Case-insensitive substring match on the name.
    async fn search_by_name(&self, name: &str, page: Pagination) -> ProductResult<Vec<Product>>;

    /// Exact price match, newest first.
    async fn find_by_price(&self, price: Decimal, page: Pagination) -> ProductResult<Vec<Product>>;

    /// Inclusive price bounds, ordered by price.
    async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
        direction: SortDirection,
        page: Pagination,
    ) -> ProductResult<Vec<Product>>;

    /// Products ranked by units ordered, highest first.
    async fn top_selling(&self, limit: u64) -> ProductResult<Vec<ProductSales>>;
}

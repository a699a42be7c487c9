//! Product Service - Business logic layer

use database::{Pagination, SortDirection};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{instrument, Span};
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductSales, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    span: Span,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Shares a repository that other services also read from.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self {
            repository,
            span: tracing::info_span!("product_service"),
        }
    }

    /// Parent span for every service operation.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[instrument(parent = &self.span, skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(parent = &self.span, skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        self.repository.delete(id).await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_products(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        self.repository.list(page).await
    }

    /// Blank terms are rejected rather than matching everything.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn search_by_name(&self, name: &str, page: Pagination) -> ProductResult<Vec<Product>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductError::Validation("name must not be empty".to_string()));
        }
        self.repository.search_by_name(name, page).await
    }

    #[instrument(parent = &self.span, skip(self), fields(price = %price))]
    pub async fn find_by_price(&self, price: Decimal, page: Pagination) -> ProductResult<Vec<Product>> {
        ensure_non_negative("price", price)?;
        self.repository.find_by_price(price, page).await
    }

    /// `min_price > max_price` is not an error; it simply matches nothing.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn find_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
        direction: SortDirection,
        page: Pagination,
    ) -> ProductResult<Vec<Product>> {
        ensure_non_negative("min_price", min_price)?;
        ensure_non_negative("max_price", max_price)?;
        self.repository
            .find_by_price_range(min_price, max_price, direction, page)
            .await
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn top_selling(&self, limit: u64) -> ProductResult<Vec<ProductSales>> {
        if limit == 0 {
            return Err(ProductError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }
        self.repository.top_selling(limit).await
    }
}

fn ensure_non_negative(name: &str, value: Decimal) -> ProductResult<()> {
    if value < Decimal::ZERO {
        return Err(ProductError::Validation(format!(
            "{name} must not be negative"
        )));
    }
    Ok(())
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            span: self.span.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::{always, eq};

    fn widget() -> CreateProduct {
        CreateProduct {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 100,
        }
    }

    #[tokio::test]
    async fn test_get_product_missing_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq("65f0c0ffee0000000000abcd"))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service
            .get_product("65f0c0ffee0000000000abcd")
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound(id) if id == "65f0c0ffee0000000000abcd"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_repository() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let mut input = widget();
        input.price = Decimal::new(-1, 0);

        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_passes_input_through() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .with(eq(widget()))
            .times(1)
            .returning(|input| Ok(Product::new("65f0c0ffee0000000000abcd".into(), input)));

        let service = ProductService::new(mock_repo);
        let product = service.create_product(widget()).await.unwrap();
        assert_eq!(product.price, Decimal::new(999, 2));
        assert_eq!(product.stock, 100);
    }

    #[tokio::test]
    async fn test_blank_name_search_is_rejected() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_search_by_name().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .search_by_name("   ", Pagination::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_price_range_forwards_direction_and_page() {
        let page = Pagination::new(2, 5).unwrap();
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_by_price_range()
            .with(
                eq(Decimal::from(1)),
                eq(Decimal::from(50)),
                eq(SortDirection::Descending),
                eq(page),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        let products = service
            .find_by_price_range(Decimal::from(1), Decimal::from(50), SortDirection::Descending, page)
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_negative_price_bound_is_rejected() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_by_price_range().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .find_by_price_range(
                Decimal::from(-1),
                Decimal::from(10),
                SortDirection::Ascending,
                Pagination::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("min_price")));
    }

    #[tokio::test]
    async fn test_top_selling_zero_limit_is_rejected() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_top_selling().with(always()).never();

        let service = ProductService::new(mock_repo);
        assert!(matches!(
            service.top_selling(0).await,
            Err(ProductError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_propagates_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_delete()
            .returning(|id| Err(ProductError::NotFound(id.to_string())));

        let service = ProductService::new(mock_repo);
        assert!(matches!(
            service.delete_product("65f0c0ffee0000000000abcd").await,
            Err(ProductError::NotFound(_))
        ));
    }
}
